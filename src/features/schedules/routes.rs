use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::schedules::handlers;
use crate::features::schedules::services::ScheduleService;

/// Dashboard routes for schedule management (admin only)
pub fn admin_routes(service: Arc<ScheduleService>) -> Router {
    Router::new()
        .route(
            "/dashboard/schedules",
            get(handlers::list_schedules).post(handlers::create_schedule),
        )
        .route(
            "/dashboard/schedules/{id}",
            get(handlers::get_schedule)
                .put(handlers::update_schedule)
                .delete(handlers::delete_schedule),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::{with_admin_auth, with_user_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> TestServer {
        let service = Arc::new(ScheduleService::new(lazy_test_pool()));
        TestServer::new(with_admin_auth(admin_routes(service))).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_non_admin() {
        let service = Arc::new(ScheduleService::new(lazy_test_pool()));
        let server = TestServer::new(with_user_auth(admin_routes(service), 2)).unwrap();
        server
            .get("/dashboard/schedules")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let response = server()
            .get("/dashboard/schedules")
            .add_query_param("from", "2025-07-01T00:00:00Z")
            .add_query_param("to", "2025-06-01T00:00:00Z")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let response = server()
            .post("/dashboard/schedules")
            .json(&json!({
                "title": "Review",
                "project_id": 1,
                "scheduled_at": "2025-06-02T10:00:00Z",
                "ends_at": "2025-06-02T09:00:00Z"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["message"].as_str().unwrap().starts_with("ends_at:"));
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let response = server()
            .put("/dashboard/schedules/3")
            .json(&json!({
                "title": "Review",
                "project_id": 1,
                "scheduled_at": "2025-06-02T10:00:00Z",
                "status": "archived"
            }))
            .await;
        assert!(response.status_code().is_client_error());
    }
}
