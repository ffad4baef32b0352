use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::search::dtos::{SearchQuery, SearchResults};
use crate::features::search::services::SearchService;

/// Search categories, projects and schedules by substring.
///
/// Returns the three result lists without the usual response envelope.
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results, empty for queries under 2 characters", body = SearchResults)
    ),
    tag = "search"
)]
pub async fn search(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>> {
    let Some(term) = query.term() else {
        return Ok(Json(SearchResults::empty()));
    };

    let results = service.search(term, query.limit()).await?;
    Ok(Json(results))
}
