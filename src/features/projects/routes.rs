use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::features::projects::dtos::MAX_IMAGE_SIZE;
use crate::features::projects::handlers;
use crate::features::projects::services::ProjectService;

/// Room for the form's text fields and multipart framing on top of the image
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Dashboard routes for project management (admin only)
pub fn admin_routes(service: Arc<ProjectService>) -> Router {
    Router::new()
        .route(
            "/dashboard/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/dashboard/projects/{id}",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + FORM_OVERHEAD))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::modules::storage::memory::MemoryStorage;
    use crate::shared::test_helpers::with_admin_auth;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    fn server() -> TestServer {
        let service = Arc::new(ProjectService::new(
            lazy_test_pool(),
            Arc::new(MemoryStorage::default()),
        ));
        TestServer::new(with_admin_auth(admin_routes(service))).unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_form() {
        let form = MultipartForm::new()
            .add_text("title", "")
            .add_text("category_id", "1")
            .add_text("start_date", "2025-01-01");

        let response = server().post("/dashboard/projects").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_disallowed_image_type() {
        let form = MultipartForm::new()
            .add_text("title", "Landing")
            .add_text("category_id", "1")
            .add_text("start_date", "2025-01-01")
            .add_part(
                "image",
                Part::bytes(b"<svg/>".to_vec())
                    .file_name("logo.svg")
                    .mime_type("image/svg+xml"),
            );

        let response = server().post("/dashboard/projects").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["message"].as_str().unwrap().starts_with("image:"));
    }

    #[tokio::test]
    async fn test_end_date_must_follow_start_date() {
        let form = MultipartForm::new()
            .add_text("title", "Landing")
            .add_text("category_id", "1")
            .add_text("start_date", "2025-02-01")
            .add_text("end_date", "2025-01-01");

        let response = server().put("/dashboard/projects/9").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
