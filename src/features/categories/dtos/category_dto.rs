use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryWithCount};
use crate::features::projects::dtos::ProjectResponseDto;
use crate::shared::validation::SLUG_REGEX;

// Create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,

    /// Generated from the name when omitted
    #[validate(
        length(max = 255),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase words separated by single hyphens")
    )]
    pub slug: Option<String>,
}

// Update request; omitted fields keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(
        length(max = 255),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase words separated by single hyphens")
    )]
    pub slug: Option<String>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            slug: c.slug,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Category with its project count (dashboard listing, popular categories)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithCountDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub projects_count: i64,
}

impl From<CategoryWithCount> for CategoryWithCountDto {
    fn from(c: CategoryWithCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            slug: c.slug,
            projects_count: c.projects_count,
        }
    }
}

/// Minimal category embedded in project responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryDto {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
}

/// Category with all of its projects
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub projects: Vec<ProjectResponseDto>,
}
