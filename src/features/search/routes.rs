use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::search::handlers;
use crate::features::search::services::SearchService;

pub fn public_routes(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/api/search", get(handlers::search))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::features::categories::CategoryService;
    use crate::features::projects::ProjectService;
    use crate::features::schedules::ScheduleService;
    use crate::modules::storage::memory::MemoryStorage;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let pool = lazy_test_pool();
        let service = SearchService::new(
            Arc::new(CategoryService::new(pool.clone())),
            Arc::new(ProjectService::new(
                pool.clone(),
                Arc::new(MemoryStorage::default()),
            )),
            Arc::new(ScheduleService::new(pool)),
        );
        TestServer::new(public_routes(Arc::new(service))).unwrap()
    }

    #[tokio::test]
    async fn test_short_queries_return_empty_lists() {
        let server = server();
        let empty = json!({ "categories": [], "projects": [], "schedules": [] });

        for q in ["", "a", "  b  "] {
            let response = server.get("/api/search").add_query_param("query", q).await;
            response.assert_status(StatusCode::OK);
            assert_eq!(response.json::<Value>(), empty);
        }

        let response = server.get("/api/search").await;
        assert_eq!(response.json::<Value>(), empty);
    }
}
