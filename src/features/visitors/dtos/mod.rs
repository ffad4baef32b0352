pub mod visitor_dto;

pub use visitor_dto::*;
