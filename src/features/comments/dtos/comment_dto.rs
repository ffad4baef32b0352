use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::comments::models::{CommentWithAuthor, RecentComment};
use crate::features::projects::dtos::ProjectSummaryDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 5000, message = "Comment must be 1-5000 characters"))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentAuthorDto {
    pub id: i64,
    pub name: String,
}

/// Response DTO for comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: i64,
    pub body: String,
    pub project_id: i64,
    pub author: CommentAuthorDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentResponseDto {
    fn from(row: CommentWithAuthor) -> Self {
        Self {
            id: row.comment.id,
            body: row.comment.body,
            project_id: row.comment.project_id,
            author: CommentAuthorDto {
                id: row.comment.user_id,
                name: row.author_name,
            },
            created_at: row.comment.created_at,
            updated_at: row.comment.updated_at,
        }
    }
}

/// Comment with the project it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecentCommentDto {
    #[serde(flatten)]
    pub comment: CommentResponseDto,
    pub project: ProjectSummaryDto,
}

impl From<RecentComment> for RecentCommentDto {
    fn from(row: RecentComment) -> Self {
        let project = ProjectSummaryDto {
            id: row.comment.project_id,
            title: row.project_title,
            slug: row.project_slug,
        };
        let comment = CommentWithAuthor {
            comment: row.comment,
            author_name: row.author_name,
        };
        Self {
            comment: comment.into(),
            project,
        }
    }
}
