pub mod web_handler;

pub use web_handler::*;
