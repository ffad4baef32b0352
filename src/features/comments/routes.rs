use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

/// Anyone may read comments
pub fn public_routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/projects/{id}/comments",
            get(handlers::list_project_comments),
        )
        .with_state(service)
}

/// Writing and deleting comments requires a signed-in user
pub fn protected_routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route("/api/projects/{id}/comments", post(handlers::create_comment))
        .route("/api/comments/{id}", delete(handlers::delete_comment))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::with_user_auth;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn service() -> Arc<CommentService> {
        Arc::new(CommentService::new(lazy_test_pool()))
    }

    #[tokio::test]
    async fn test_delete_requires_user() {
        let server = TestServer::new(protected_routes(service())).unwrap();
        server
            .delete("/api/comments/4")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_comment_is_rejected() {
        let server = TestServer::new(with_user_auth(protected_routes(service()), 3)).unwrap();
        let response = server
            .post("/api/projects/1/comments")
            .json(&json!({ "body": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["errors"][0].as_str().unwrap().starts_with("body:"));
    }
}
