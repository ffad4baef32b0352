use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::CategoryDetailDto;
use crate::features::categories::CategoryService;
use crate::features::projects::dtos::BrowseQuery;
use crate::features::projects::ProjectService;
use crate::features::schedules::ScheduleService;
use crate::features::visitors::{VisitContext, VisitMetadata, VisitorService};
use crate::features::web::dtos::{BrowseDto, ContactDto, HomeDto, ShowProjectDto, ShowScheduleDto};
use crate::shared::constants::{
    FEATURED_PROJECTS_LIMIT, POPULAR_CATEGORIES_LIMIT, RELATED_PROJECTS_LIMIT,
    UPCOMING_SCHEDULES_LIMIT,
};
use crate::shared::types::{ApiResponse, Meta};

/// Shared state for public pages
#[derive(Clone)]
pub struct WebState {
    pub categories: Arc<CategoryService>,
    pub projects: Arc<ProjectService>,
    pub schedules: Arc<ScheduleService>,
    pub visitors: Arc<VisitorService>,
}

/// Featured projects, categories and upcoming schedules
#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Landing page content", body = ApiResponse<HomeDto>)
    ),
    tag = "public"
)]
pub async fn home(
    State(state): State<WebState>,
    ctx: VisitContext,
    uri: Uri,
) -> Result<Json<ApiResponse<HomeDto>>> {
    let (featured, categories, upcoming) = tokio::try_join!(
        state.projects.featured(FEATURED_PROJECTS_LIMIT),
        state.categories.list_all(),
        state.schedules.upcoming(Utc::now(), UPCOMING_SCHEDULES_LIMIT),
    )?;

    state
        .visitors
        .record_visit_or_warn(&ctx, uri.path(), VisitMetadata::new().with("page", "home"))
        .await;

    Ok(Json(ApiResponse::success(
        Some(HomeDto {
            featured,
            categories,
            upcoming,
        }),
        None,
        None,
    )))
}

/// Browse projects by category and search term, newest first
#[utoipa::path(
    get,
    path = "/browse",
    params(BrowseQuery),
    responses(
        (status = 200, description = "One page of projects", body = ApiResponse<BrowseDto>),
        (status = 400, description = "Category is not a number")
    ),
    tag = "public"
)]
pub async fn browse(
    State(state): State<WebState>,
    ctx: VisitContext,
    uri: Uri,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ApiResponse<BrowseDto>>> {
    let filter = query.filter()?;
    let pagination = query.pagination();

    let ((projects, total), categories) = tokio::try_join!(
        state.projects.browse(&filter, &pagination),
        state.categories.list_all(),
    )?;

    let metadata = VisitMetadata::new()
        .with("page", "browse")
        .with_opt("category", filter.category)
        .with_opt("search", filter.search.clone());
    state
        .visitors
        .record_visit_or_warn(&ctx, uri.path(), metadata)
        .await;

    Ok(Json(ApiResponse::success(
        Some(BrowseDto {
            projects,
            categories,
            filter,
        }),
        None,
        Some(Meta::paged(total, &pagination)),
    )))
}

/// Project detail by slug, with related projects and popular categories
#[utoipa::path(
    get,
    path = "/show/{slug}",
    params(
        ("slug" = String, Path, description = "Project slug")
    ),
    responses(
        (status = 200, description = "Project found", body = ApiResponse<ShowProjectDto>),
        (status = 404, description = "Project not found")
    ),
    tag = "public"
)]
pub async fn show_project(
    State(state): State<WebState>,
    ctx: VisitContext,
    uri: Uri,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ShowProjectDto>>> {
    let project = state
        .projects
        .find_with_relations_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project '{}' not found", slug)))?;

    let (related, popular_categories) = tokio::try_join!(
        state.projects.related(
            project.project.id,
            project.project.category_id,
            RELATED_PROJECTS_LIMIT
        ),
        state.categories.popular(POPULAR_CATEGORIES_LIMIT),
    )?;

    state
        .visitors
        .record_visit_or_warn(
            &ctx,
            uri.path(),
            VisitMetadata::new()
                .with("page", "project")
                .with("project_id", project.project.id),
        )
        .await;

    Ok(Json(ApiResponse::success(
        Some(ShowProjectDto {
            project,
            related,
            popular_categories,
        }),
        None,
        None,
    )))
}

/// Schedule detail with the next upcoming schedules
#[utoipa::path(
    get,
    path = "/showjadwal/{id}",
    params(
        ("id" = i64, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule found", body = ApiResponse<ShowScheduleDto>),
        (status = 404, description = "Schedule not found")
    ),
    tag = "public"
)]
pub async fn show_schedule(
    State(state): State<WebState>,
    ctx: VisitContext,
    uri: Uri,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ShowScheduleDto>>> {
    let schedule = state
        .schedules
        .find_with_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Schedule with id {} not found", id)))?;
    let upcoming = state
        .schedules
        .upcoming(Utc::now(), UPCOMING_SCHEDULES_LIMIT)
        .await?;

    state
        .visitors
        .record_visit_or_warn(
            &ctx,
            uri.path(),
            VisitMetadata::new()
                .with("page", "schedule")
                .with("schedule_id", id),
        )
        .await;

    Ok(Json(ApiResponse::success(
        Some(ShowScheduleDto { schedule, upcoming }),
        None,
        None,
    )))
}

/// A category and all of its projects
#[utoipa::path(
    get,
    path = "/categories/{id}/projects",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Projects of the category", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "public"
)]
pub async fn category_projects(
    State(state): State<WebState>,
    ctx: VisitContext,
    uri: Uri,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;
    let projects = state.projects.list_by_category(id).await?;
    let total = projects.len() as i64;

    state
        .visitors
        .record_visit_or_warn(
            &ctx,
            uri.path(),
            VisitMetadata::new()
                .with("page", "category")
                .with("category_id", id),
        )
        .await;

    Ok(Json(ApiResponse::success(
        Some(CategoryDetailDto { category, projects }),
        None,
        Some(Meta::total(total)),
    )))
}

/// Contact form; submissions are logged, not stored
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactDto,
    responses(
        (status = 200, description = "Message received"),
        (status = 400, description = "Validation error")
    ),
    tag = "public"
)]
pub async fn contact(AppJson(dto): AppJson<ContactDto>) -> Result<Json<ApiResponse<()>>> {
    dto.validate()?;

    tracing::info!(
        name = %dto.name,
        email = %dto.email,
        subject = dto.subject.as_deref().unwrap_or(""),
        "Contact message received ({} chars)",
        dto.message.chars().count()
    );

    Ok(Json(ApiResponse::success(
        None,
        Some("Thank you, your message has been received".to_string()),
        None,
    )))
}
