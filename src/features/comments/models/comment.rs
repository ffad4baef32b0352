use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Select of comments with their author, `c` is the comment alias and `u` the user
pub const COMMENT_WITH_AUTHOR_SELECT: &str = "SELECT c.id, c.body, c.user_id, c.project_id, \
     c.created_at, c.updated_at, u.name AS author_name \
     FROM comments c JOIN users u ON u.id = c.user_id";

/// Database model for comment
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub user_id: i64,
    pub project_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment joined with its author's name
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_name: String,
}

/// Comment joined with its author and project, for the dashboard feed
#[derive(Debug, Clone, FromRow)]
pub struct RecentComment {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_name: String,
    pub project_title: String,
    pub project_slug: String,
}
