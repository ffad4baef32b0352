use axum::{
    routing::{get, post},
    Router,
};

use crate::features::web::handlers::{self, WebState};

/// Public pages; the caller may be anonymous
pub fn public_routes(state: WebState) -> Router {
    Router::new()
        .route("/api/home", get(handlers::home))
        .route("/browse", get(handlers::browse))
        .route("/show/{slug}", get(handlers::show_project))
        .route("/showjadwal/{id}", get(handlers::show_schedule))
        .route("/categories/{id}/projects", get(handlers::category_projects))
        .route("/contact", post(handlers::contact))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::categories::CategoryService;
    use crate::features::projects::ProjectService;
    use crate::features::schedules::ScheduleService;
    use crate::features::visitors::VisitorService;
    use crate::modules::storage::memory::MemoryStorage;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn server() -> TestServer {
        let pool = lazy_test_pool();
        let state = WebState {
            categories: Arc::new(CategoryService::new(pool.clone())),
            projects: Arc::new(ProjectService::new(
                pool.clone(),
                Arc::new(MemoryStorage::default()),
            )),
            schedules: Arc::new(ScheduleService::new(pool.clone())),
            visitors: Arc::new(VisitorService::new(pool)),
        };
        TestServer::new(public_routes(state)).unwrap()
    }

    #[tokio::test]
    async fn test_browse_rejects_non_numeric_category() {
        let response = server()
            .get("/browse")
            .add_query_param("category", "web")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("category:"));
    }

    #[tokio::test]
    async fn test_contact_accepts_valid_message() {
        let response = server()
            .post("/contact")
            .json(&json!({
                "name": "Ana",
                "email": "ana@example.com",
                "message": "Do you take freelance work?"
            }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_contact_reports_invalid_fields() {
        let response = server()
            .post("/contact")
            .json(&json!({ "name": "Ana", "email": "nope", "message": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        let errors: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e.as_str().unwrap())
            .collect();
        assert!(errors.iter().any(|e| e.starts_with("email:")));
        assert!(errors.iter().any(|e| e.starts_with("message:")));
    }

    #[tokio::test]
    async fn test_schedule_id_must_be_numeric() {
        let response = server().get("/showjadwal/next-week").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
