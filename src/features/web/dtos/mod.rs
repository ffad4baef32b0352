pub mod web_dto;

pub use web_dto::*;
