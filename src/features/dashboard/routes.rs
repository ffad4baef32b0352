use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Admin dashboard overview and visitor log
pub fn admin_routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_overview))
        .route("/dashboard/visitors", get(handlers::list_visitors))
        .with_state(service)
}
