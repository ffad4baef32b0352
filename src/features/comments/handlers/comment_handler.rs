use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::comments::services::CommentService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List comments of a project, newest first
#[utoipa::path(
    get,
    path = "/api/projects/{id}/comments",
    params(
        ("id" = i64, Path, description = "Project ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Comments retrieved", body = ApiResponse<Vec<CommentResponseDto>>)
    ),
    tag = "comments"
)]
pub async fn list_project_comments(
    State(service): State<Arc<CommentService>>,
    Path(project_id): Path<i64>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    let (comments, total) = service.list_by_project(project_id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(comments),
        None,
        Some(Meta::paged(total, &pagination)),
    )))
}

/// Comment on a project as the authenticated user
#[utoipa::path(
    post,
    path = "/api/projects/{id}/comments",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Project not found")
    ),
    tag = "comments",
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(project_id): Path<i64>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    dto.validate()?;

    let comment = service.create(project_id, user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(comment),
            Some("Comment added".to_string()),
            None,
        )),
    ))
}

/// Delete a comment; owners delete their own, admins any
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(
        ("id" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the comment's author"),
        (status = 404, description = "Comment not found")
    ),
    tag = "comments",
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Comment deleted".to_string()),
        None,
    )))
}
