use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::schedules::dtos::{ScheduleFormDto, ScheduleQuery, ScheduleResponseDto};
use crate::features::schedules::services::ScheduleService;
use crate::shared::types::{ApiResponse, Meta};

/// List schedules by start time, optionally filtered (admin only)
#[utoipa::path(
    get,
    path = "/dashboard/schedules",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Schedules retrieved", body = ApiResponse<Vec<ScheduleResponseDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn list_schedules(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ScheduleService>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ApiResponse<Vec<ScheduleResponseDto>>>> {
    query.check_range()?;

    let (schedules, total) = service.list(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(schedules),
        None,
        Some(Meta::paged(total, &query.pagination())),
    )))
}

/// Create a schedule (admin only)
#[utoipa::path(
    post,
    path = "/dashboard/schedules",
    request_body = ScheduleFormDto,
    responses(
        (status = 201, description = "Schedule created", body = ApiResponse<ScheduleResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn create_schedule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ScheduleService>>,
    AppJson(dto): AppJson<ScheduleFormDto>,
) -> Result<(StatusCode, Json<ApiResponse<ScheduleResponseDto>>)> {
    dto.validate()?;
    dto.check_times()?;

    let schedule = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(schedule),
            Some("Schedule created successfully".to_string()),
            None,
        )),
    ))
}

/// Get a schedule with its project (admin only)
#[utoipa::path(
    get,
    path = "/dashboard/schedules/{id}",
    params(
        ("id" = i64, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule found", body = ApiResponse<ScheduleResponseDto>),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn get_schedule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ScheduleResponseDto>>> {
    let schedule = service
        .find_with_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Schedule with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(Some(schedule), None, None)))
}

/// Update a schedule; any status may be set (admin only)
#[utoipa::path(
    put,
    path = "/dashboard/schedules/{id}",
    params(
        ("id" = i64, Path, description = "Schedule ID")
    ),
    request_body = ScheduleFormDto,
    responses(
        (status = 200, description = "Schedule updated", body = ApiResponse<ScheduleResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn update_schedule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<ScheduleFormDto>,
) -> Result<Json<ApiResponse<ScheduleResponseDto>>> {
    dto.validate()?;
    dto.check_times()?;

    let schedule = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(schedule),
        Some("Schedule updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/dashboard/schedules/{id}",
    params(
        ("id" = i64, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule deleted"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn delete_schedule(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ScheduleService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Schedule deleted successfully".to_string()),
        None,
    )))
}
