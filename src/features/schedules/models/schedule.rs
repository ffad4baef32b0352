use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Column list for `Schedule`, qualified with the `s` alias
pub const SCHEDULE_COLUMNS: &str = "s.id, s.title, s.description, s.project_id, s.scheduled_at, \
     s.ends_at, s.status, s.created_at, s.updated_at";

/// Schedule status enum matching database enum.
///
/// Any status may be set to any other; there is no transition graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "schedule_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleStatus::Pending => write!(f, "pending"),
            ScheduleStatus::InProgress => write!(f, "in_progress"),
            ScheduleStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Database model for schedule
#[derive(Debug, Clone, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub project_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Schedule row joined with its project
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleWithProject {
    #[sqlx(flatten)]
    pub schedule: Schedule,
    pub project_title: String,
    pub project_slug: String,
}
