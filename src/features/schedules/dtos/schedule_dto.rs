use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::AppError;
use crate::features::projects::dtos::ProjectSummaryDto;
use crate::features::schedules::models::{Schedule, ScheduleStatus, ScheduleWithProject};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

/// Schedule fields for create and update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ScheduleFormDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub description: Option<String>,

    pub project_id: i64,

    pub scheduled_at: DateTime<Utc>,

    pub ends_at: Option<DateTime<Utc>>,

    /// Defaults to `pending` on create; kept as-is on update when omitted
    pub status: Option<ScheduleStatus>,
}

impl ScheduleFormDto {
    /// End, when given, may not precede the start
    pub fn check_times(&self) -> Result<(), AppError> {
        match self.ends_at {
            Some(end) if end < self.scheduled_at => Err(AppError::Validation(
                "ends_at: must be on or after scheduled_at".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Dashboard schedule listing filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ScheduleQuery {
    pub project_id: Option<i64>,
    /// Start of the date range (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// End of the date range (RFC 3339)
    pub to: Option<DateTime<Utc>>,
    #[param(minimum = 1)]
    pub page: Option<i64>,
    #[param(minimum = 1, maximum = 100)]
    pub page_size: Option<i64>,
}

impl ScheduleQuery {
    pub fn check_range(&self) -> Result<(), AppError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(AppError::Validation(
                "from: must not be after to".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Response DTO for schedule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleResponseDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub project_id: i64,
    /// Present when the query joins the project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectSummaryDto>,
    pub scheduled_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Schedule> for ScheduleResponseDto {
    fn from(s: Schedule) -> Self {
        Self {
            id: s.id,
            title: s.title,
            description: s.description,
            project_id: s.project_id,
            project: None,
            scheduled_at: s.scheduled_at,
            ends_at: s.ends_at,
            status: s.status,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl From<ScheduleWithProject> for ScheduleResponseDto {
    fn from(row: ScheduleWithProject) -> Self {
        let project = ProjectSummaryDto {
            id: row.schedule.project_id,
            title: row.project_title,
            slug: row.project_slug,
        };
        Self {
            project: Some(project),
            ..row.schedule.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn form(ends_in_hours: Option<i64>) -> ScheduleFormDto {
        let start = Utc::now();
        ScheduleFormDto {
            title: "Kickoff".to_string(),
            description: None,
            project_id: 1,
            scheduled_at: start,
            ends_at: ends_in_hours.map(|h| start + Duration::hours(h)),
            status: None,
        }
    }

    #[test]
    fn test_check_times() {
        assert!(form(None).check_times().is_ok());
        assert!(form(Some(0)).check_times().is_ok());
        assert!(form(Some(2)).check_times().is_ok());
        assert!(form(Some(-1)).check_times().is_err());
    }

    #[test]
    fn test_form_accepts_any_status() {
        let dto: ScheduleFormDto = serde_json::from_str(
            r#"{"title":"Demo","project_id":3,"scheduled_at":"2025-06-01T09:00:00Z","status":"completed"}"#,
        )
        .unwrap();
        assert_eq!(dto.status, Some(ScheduleStatus::Completed));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_check_range() {
        let now = Utc::now();
        let query = ScheduleQuery {
            from: Some(now),
            to: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert!(query.check_range().is_err());

        let open_ended = ScheduleQuery {
            from: Some(now),
            ..Default::default()
        };
        assert!(open_ended.check_range().is_ok());
        assert_eq!(open_ended.pagination().limit(), DEFAULT_PAGE_SIZE);
    }
}
