use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Column list for `Project`, qualified with the `p` alias
pub const PROJECT_COLUMNS: &str = "p.id, p.title, p.image, p.slug, p.link, p.description, \
     p.category_id, p.start_date, p.end_date, p.created_at, p.updated_at";

/// Database model for project
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub slug: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub category_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project row joined with its category
#[derive(Debug, Clone, FromRow)]
pub struct ProjectWithCategory {
    #[sqlx(flatten)]
    pub project: Project,
    pub category_name: String,
    pub category_slug: Option<String>,
}
