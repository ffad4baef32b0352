use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::dashboard::dtos::DashboardOverviewDto;
use crate::features::dashboard::services::DashboardService;
use crate::features::visitors::dtos::{StatsQuery, VisitorLogResponseDto};
use crate::shared::constants::VISITOR_CHART_DEFAULT_DAYS;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Visitor statistics, popular categories, content totals and recent comments
#[utoipa::path(
    get,
    path = "/dashboard",
    params(StatsQuery),
    responses(
        (status = 200, description = "Dashboard overview", body = ApiResponse<DashboardOverviewDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "dashboard",
    security(("bearer_auth" = []))
)]
pub async fn get_overview(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<DashboardOverviewDto>>> {
    let days = query.days.unwrap_or(VISITOR_CHART_DEFAULT_DAYS);
    let overview = service.overview(Utc::now(), days).await?;
    Ok(Json(ApiResponse::success(Some(overview), None, None)))
}

/// Visitor log, newest first (admin only)
#[utoipa::path(
    get,
    path = "/dashboard/visitors",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Visitor logs", body = ApiResponse<Vec<VisitorLogResponseDto>>),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "dashboard",
    security(("bearer_auth" = []))
)]
pub async fn list_visitors(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DashboardService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<VisitorLogResponseDto>>>> {
    let (logs, total) = service.visitor_logs(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(logs),
        None,
        Some(Meta::paged(total, &pagination)),
    )))
}
