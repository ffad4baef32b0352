use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::AppError;
use crate::features::categories::dtos::CategorySummaryDto;
use crate::features::comments::dtos::CommentResponseDto;
use crate::features::projects::models::{Project, ProjectWithCategory};
use crate::features::schedules::dtos::ScheduleResponseDto;
use crate::shared::constants::BROWSE_PAGE_SIZE;
use crate::shared::types::{non_blank, PaginationQuery};
use crate::shared::validation::SLUG_REGEX;

/// Allowed MIME types for project images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum image size in bytes (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// Get file extension from content type
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Project fields submitted by the dashboard form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProjectFormDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Generated from the title when omitted
    #[validate(
        length(max = 255),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase words separated by single hyphens")
    )]
    pub slug: Option<String>,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,

    pub description: Option<String>,

    pub category_id: i64,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,
}

impl ProjectFormDto {
    /// Build the form from multipart text fields. Blank optional fields are treated as absent.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, AppError> {
        let text = |name: &str| non_blank(fields.get(name).map(String::as_str)).map(str::to_string);

        let category_id = text("category_id")
            .ok_or_else(|| AppError::Validation("category_id: is required".to_string()))?
            .parse::<i64>()
            .map_err(|_| AppError::Validation("category_id: must be a numeric id".to_string()))?;

        let start_date = text("start_date")
            .ok_or_else(|| AppError::Validation("start_date: is required".to_string()))
            .and_then(|s| parse_date("start_date", &s))?;

        let end_date = text("end_date")
            .map(|s| parse_date("end_date", &s))
            .transpose()?;

        Ok(Self {
            title: fields
                .get("title")
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            slug: text("slug"),
            link: text("link"),
            description: text("description"),
            category_id,
            start_date,
            end_date,
        })
    }

    /// End date, when given, may not precede the start date
    pub fn check_dates(&self) -> Result<(), AppError> {
        match self.end_date {
            Some(end) if end < self.start_date => Err(AppError::Validation(
                "end_date: must be on or after start_date".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{}: must be a date (YYYY-MM-DD)", field)))
}

/// Image file received with a project form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl ImageUpload {
    pub fn check(&self) -> Result<(), AppError> {
        if self.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::Validation(format!(
                "image: file too large, maximum size is {} MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            )));
        }
        if !is_image_type_allowed(&self.content_type) {
            return Err(AppError::Validation(format!(
                "image: type '{}' is not allowed, allowed types: {}",
                self.content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }
        Ok(())
    }
}

/// Multipart project form for OpenAPI documentation.
/// The handlers read the multipart stream directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ProjectUploadForm {
    pub title: String,
    pub slug: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub category_id: i64,
    #[schema(example = "2025-01-31")]
    pub start_date: String,
    pub end_date: Option<String>,
    /// jpeg, png, gif or webp, at most 5MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Response DTO for project
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponseDto {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub slug: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub category_id: i64,
    /// Present when the listing joins the category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummaryDto>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponseDto {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            image: p.image,
            slug: p.slug,
            link: p.link,
            description: p.description,
            category_id: p.category_id,
            category: None,
            start_date: p.start_date,
            end_date: p.end_date,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<ProjectWithCategory> for ProjectResponseDto {
    fn from(row: ProjectWithCategory) -> Self {
        let category = CategorySummaryDto {
            id: row.project.category_id,
            name: row.category_name,
            slug: row.category_slug,
        };
        Self {
            category: Some(category),
            ..row.project.into()
        }
    }
}

/// Minimal project embedded in schedule and comment responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectSummaryDto {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

/// Project with its category, schedules and comments
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectDetailDto {
    #[serde(flatten)]
    pub project: ProjectResponseDto,
    pub schedules: Vec<ScheduleResponseDto>,
    pub comments: Vec<CommentResponseDto>,
}

/// Query parameters of the public project browser
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct BrowseQuery {
    /// Category id; blank means all categories
    pub category: Option<String>,
    /// Case-insensitive match on title or description
    pub search: Option<String>,
    #[param(minimum = 1)]
    pub page: Option<i64>,
    #[param(minimum = 1, maximum = 100)]
    pub page_size: Option<i64>,
}

/// Validated browse filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct BrowseFilter {
    pub category: Option<i64>,
    pub search: Option<String>,
}

impl BrowseQuery {
    pub fn filter(&self) -> Result<BrowseFilter, AppError> {
        let category = non_blank(self.category.as_deref())
            .map(|c| {
                c.parse::<i64>().map_err(|_| {
                    AppError::Validation("category: must be a numeric category id".to_string())
                })
            })
            .transpose()?;

        Ok(BrowseFilter {
            category,
            search: non_blank(self.search.as_deref()).map(str::to_string),
        })
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(BROWSE_PAGE_SIZE),
        )
    }
}
