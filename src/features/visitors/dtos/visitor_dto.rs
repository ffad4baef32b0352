use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::features::visitors::models::VisitorLogWithUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PathCountDto {
    pub path: String,
    pub count: i64,
}

/// Visits on one UTC calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DateCountDto {
    pub date: NaiveDate,
    pub count: i64,
}

/// Visitor statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitorStatsDto {
    pub total: i64,
    /// Visits on the current UTC date
    pub today: i64,
    /// Visits in the last 7 days
    pub week: i64,
    /// Visits in the last 30 days
    pub month: i64,
    /// Visits per path, most visited first
    pub by_path: Vec<PathCountDto>,
    /// Visits per day over the chart window, oldest first
    pub by_date: Vec<DateCountDto>,
    /// Length of the chart window in days
    pub days: i64,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct StatsQuery {
    /// Days covered by the per-day chart (1-365, default 7)
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitorLogResponseDto {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub path: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub visited_at: DateTime<Utc>,
}

impl From<VisitorLogWithUser> for VisitorLogResponseDto {
    fn from(row: VisitorLogWithUser) -> Self {
        Self {
            id: row.log.id,
            user_id: row.log.user_id,
            user_name: row.user_name,
            path: row.log.path,
            ip_address: row.log.ip_address,
            user_agent: row.log.user_agent,
            metadata: row.log.metadata,
            visited_at: row.log.visited_at,
        }
    }
}
