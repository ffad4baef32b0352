use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category joined with the number of projects that reference it
#[derive(Debug, Clone, FromRow)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub projects_count: i64,
}
