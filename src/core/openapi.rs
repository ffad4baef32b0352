use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::projects::{dtos as projects_dtos, handlers as projects_handlers};
use crate::features::schedules::{
    dtos as schedules_dtos, handlers as schedules_handlers, models as schedules_models,
};
use crate::features::search::{dtos as search_dtos, handlers as search_handlers};
use crate::features::visitors::dtos as visitors_dtos;
use crate::features::web::{dtos as web_dtos, handlers as web_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Public pages
        web_handlers::home,
        web_handlers::browse,
        web_handlers::show_project,
        web_handlers::show_schedule,
        web_handlers::category_projects,
        web_handlers::contact,
        // Search
        search_handlers::search,
        // Comments
        comments_handlers::list_project_comments,
        comments_handlers::create_comment,
        comments_handlers::delete_comment,
        // Dashboard
        dashboard_handlers::get_overview,
        dashboard_handlers::list_visitors,
        // Projects (admin)
        projects_handlers::list_projects,
        projects_handlers::create_project,
        projects_handlers::get_project,
        projects_handlers::update_project,
        projects_handlers::delete_project,
        // Categories (admin)
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::get_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Schedules (admin)
        schedules_handlers::list_schedules,
        schedules_handlers::create_schedule,
        schedules_handlers::get_schedule,
        schedules_handlers::update_schedule,
        schedules_handlers::delete_schedule,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Public pages
            web_dtos::ContactDto,
            ApiResponse<web_dtos::HomeDto>,
            ApiResponse<web_dtos::BrowseDto>,
            ApiResponse<web_dtos::ShowProjectDto>,
            ApiResponse<web_dtos::ShowScheduleDto>,
            // Search
            search_dtos::SearchHit,
            search_dtos::SearchResults,
            // Projects
            projects_dtos::ProjectUploadForm,
            projects_dtos::BrowseFilter,
            ApiResponse<Vec<projects_dtos::ProjectResponseDto>>,
            ApiResponse<projects_dtos::ProjectResponseDto>,
            ApiResponse<projects_dtos::ProjectDetailDto>,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            ApiResponse<Vec<categories_dtos::CategoryWithCountDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::CategoryDetailDto>,
            // Schedules
            schedules_models::ScheduleStatus,
            schedules_dtos::ScheduleFormDto,
            ApiResponse<Vec<schedules_dtos::ScheduleResponseDto>>,
            ApiResponse<schedules_dtos::ScheduleResponseDto>,
            // Comments
            comments_dtos::CreateCommentDto,
            ApiResponse<Vec<comments_dtos::CommentResponseDto>>,
            ApiResponse<comments_dtos::CommentResponseDto>,
            // Dashboard
            visitors_dtos::VisitorStatsDto,
            ApiResponse<dashboard_dtos::DashboardOverviewDto>,
            ApiResponse<Vec<visitors_dtos::VisitorLogResponseDto>>,
        )
    ),
    tags(
        (name = "public", description = "Public portfolio pages (visits are logged)"),
        (name = "search", description = "Search across categories, projects and schedules"),
        (name = "comments", description = "Project comments"),
        (name = "dashboard", description = "Admin overview and visitor log"),
        (name = "projects", description = "Project management (admin only)"),
        (name = "categories", description = "Category management (admin only)"),
        (name = "schedules", description = "Schedule management (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Portfolio API",
        version = "0.1.0",
        description = "API documentation for the portfolio backend",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/home",
            "/browse",
            "/show/{slug}",
            "/showjadwal/{id}",
            "/categories/{id}/projects",
            "/contact",
            "/api/search",
            "/api/projects/{id}/comments",
            "/api/comments/{id}",
            "/dashboard",
            "/dashboard/visitors",
            "/dashboard/projects/{id}",
            "/dashboard/categories/{id}",
            "/dashboard/schedules/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Portfolio".to_string(),
            version: "2.0.0".to_string(),
            description: "docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Portfolio");
        assert_eq!(doc.info.version, "2.0.0");
        assert_eq!(doc.info.description.as_deref(), Some("docs"));
    }
}
