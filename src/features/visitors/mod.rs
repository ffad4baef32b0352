//! Visitor log: recording page visits and aggregating them for the dashboard.

pub mod dtos;
pub mod models;
pub mod services;

pub use models::{VisitContext, VisitMetadata};
pub use services::VisitorService;
