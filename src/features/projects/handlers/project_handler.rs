use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireAdmin;
use crate::features::projects::dtos::{
    ImageUpload, ProjectDetailDto, ProjectFormDto, ProjectResponseDto, ProjectUploadForm,
};
use crate::features::projects::services::ProjectService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Read a multipart project form: text fields plus an optional `image` file
async fn read_project_form(
    mut multipart: Multipart,
) -> Result<(ProjectFormDto, Option<ImageUpload>)> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "image" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let file_name = field.file_name().unwrap_or("image").to_string();
            let data = field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read image data: {}", e))
            })?;

            // browsers send an empty part when no file was chosen
            if !data.is_empty() {
                image = Some(ImageUpload {
                    data: data.to_vec(),
                    file_name,
                    content_type,
                });
            }
        } else {
            let text = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
            })?;
            fields.insert(name, text);
        }
    }

    let form = ProjectFormDto::from_fields(&fields)?;
    form.validate()?;
    form.check_dates()?;
    if let Some(image) = &image {
        image.check()?;
    }

    Ok((form, image))
}

/// List projects, newest first (admin only)
#[utoipa::path(
    get,
    path = "/dashboard/projects",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Projects retrieved", body = ApiResponse<Vec<ProjectResponseDto>>),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn list_projects(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProjectService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ProjectResponseDto>>>> {
    let (projects, total) = service.list(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(projects),
        None,
        Some(Meta::paged(total, &pagination)),
    )))
}

/// Create a project (admin only)
#[utoipa::path(
    post,
    path = "/dashboard/projects",
    request_body(
        content = ProjectUploadForm,
        content_type = "multipart/form-data",
        description = "Project fields with an optional image",
    ),
    responses(
        (status = 201, description = "Project created", body = ApiResponse<ProjectResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already in use"),
        (status = 502, description = "Image storage unavailable")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProjectService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ProjectResponseDto>>)> {
    let (form, image) = read_project_form(multipart).await?;

    let project = service.create(form, image).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(project),
            Some("Project created successfully".to_string()),
            None,
        )),
    ))
}

/// Get a project with category, schedules and comments (admin only)
#[utoipa::path(
    get,
    path = "/dashboard/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project found", body = ApiResponse<ProjectDetailDto>),
        (status = 404, description = "Project not found")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProjectDetailDto>>> {
    let project = service
        .find_with_relations(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project with id {} not found", id)))?;
    Ok(Json(ApiResponse::success(Some(project), None, None)))
}

/// Update a project (admin only)
#[utoipa::path(
    put,
    path = "/dashboard/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    request_body(
        content = ProjectUploadForm,
        content_type = "multipart/form-data",
        description = "Project fields; a new image replaces the current one",
    ),
    responses(
        (status = 200, description = "Project updated", body = ApiResponse<ProjectResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn update_project(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ProjectResponseDto>>> {
    let (form, image) = read_project_form(multipart).await?;

    let project = service.update(id, form, image).await?;
    Ok(Json(ApiResponse::success(
        Some(project),
        Some("Project updated successfully".to_string()),
        None,
    )))
}

/// Delete a project with its schedules, comments and image (admin only)
#[utoipa::path(
    delete,
    path = "/dashboard/projects/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 404, description = "Project not found"),
        (status = 502, description = "Image could not be removed; nothing was deleted")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Project deleted successfully".to_string()),
        None,
    )))
}
