//! Public, read-only pages. Each page view is recorded in the visitor log.

pub mod dtos;
pub mod handlers;
pub mod routes;

pub use handlers::WebState;
