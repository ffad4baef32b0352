//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services (image storage).

pub mod storage;
