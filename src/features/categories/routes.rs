use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Dashboard routes for category management (admin only)
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/dashboard/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/dashboard/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
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

    fn service() -> Arc<CategoryService> {
        Arc::new(CategoryService::new(lazy_test_pool()))
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let server = TestServer::new(admin_routes(service())).unwrap();
        let response = server.get("/dashboard/categories").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rejects_non_admin() {
        let server = TestServer::new(with_user_auth(admin_routes(service()), 5)).unwrap();
        let response = server.delete("/dashboard/categories/1").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let server = TestServer::new(with_admin_auth(admin_routes(service()))).unwrap();
        let response = server
            .post("/dashboard/categories")
            .json(&json!({ "name": "", "slug": "Not A Slug" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("name:")));
        assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("slug:")));
    }
}
