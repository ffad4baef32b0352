use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::schedules::dtos::{ScheduleFormDto, ScheduleQuery, ScheduleResponseDto};
use crate::features::schedules::models::{Schedule, ScheduleWithProject, SCHEDULE_COLUMNS};
use crate::shared::sql::{bind_all, bind_all_scalar, contains_pattern, BindValue, WhereClause};

fn select_with_project() -> String {
    format!(
        "SELECT {}, p.title AS project_title, p.slug AS project_slug \
         FROM schedules s JOIN projects p ON p.id = s.project_id",
        SCHEDULE_COLUMNS
    )
}

/// Schedules overlapping `[from, to]` by start or end; a missing bound is open
fn push_date_range(
    clause: &mut WhereClause,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) {
    match (from, to) {
        (Some(from), Some(to)) => clause.push_all(
            "(s.scheduled_at BETWEEN {0} AND {1} OR s.ends_at BETWEEN {0} AND {1})",
            vec![BindValue::Timestamp(from), BindValue::Timestamp(to)],
        ),
        (Some(from), None) => clause.push(
            "(s.scheduled_at >= {} OR s.ends_at >= {})",
            BindValue::Timestamp(from),
        ),
        (None, Some(to)) => clause.push(
            "(s.scheduled_at <= {} OR s.ends_at <= {})",
            BindValue::Timestamp(to),
        ),
        (None, None) => {}
    }
}

fn schedule_clause(query: &ScheduleQuery) -> WhereClause {
    let mut clause = WhereClause::new();
    if let Some(project_id) = query.project_id {
        clause.push("s.project_id = {}", BindValue::Int(project_id));
    }
    push_date_range(&mut clause, query.from, query.to);
    clause
}

/// Service for schedule operations
pub struct ScheduleService {
    pool: PgPool,
}

impl ScheduleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered listing ordered by start time
    /// Returns (schedules, total_count)
    pub async fn list(&self, query: &ScheduleQuery) -> Result<(Vec<ScheduleResponseDto>, i64)> {
        let clause = schedule_clause(query);
        let where_sql = clause.to_sql();
        let pagination = query.pagination();

        let count_query = format!("SELECT COUNT(*) FROM schedules s {}", where_sql);
        let total: i64 = bind_all_scalar(sqlx::query_scalar(&count_query), clause.binds())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count schedules: {:?}", e);
                AppError::Database(e)
            })?;

        let sql = format!(
            "{} {} ORDER BY s.scheduled_at, s.id LIMIT ${} OFFSET ${}",
            select_with_project(),
            where_sql,
            clause.binds().len() + 1,
            clause.binds().len() + 2
        );
        let rows: Vec<ScheduleWithProject> = bind_all(sqlx::query_as(&sql), clause.binds())
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list schedules: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Schedules starting at or after `now`, soonest first
    pub async fn upcoming(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ScheduleResponseDto>> {
        let sql = format!(
            "{} WHERE s.scheduled_at >= $1 ORDER BY s.scheduled_at, s.id LIMIT $2",
            select_with_project()
        );
        let rows: Vec<ScheduleWithProject> = sqlx::query_as(&sql)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get upcoming schedules: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_with_project(&self, id: i64) -> Result<Option<ScheduleResponseDto>> {
        let sql = format!("{} WHERE s.id = $1", select_with_project());
        let row: Option<ScheduleWithProject> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get schedule {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(row.map(Into::into))
    }

    pub async fn create(&self, dto: ScheduleFormDto) -> Result<ScheduleResponseDto> {
        self.ensure_project_exists(dto.project_id).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO schedules (title, description, project_id, scheduled_at, ends_at, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.project_id)
        .bind(dto.scheduled_at)
        .bind(dto.ends_at)
        .bind(dto.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!("Schedule {} created for project {}", id, dto.project_id);
        self.find_with_project(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Schedule {} vanished after insert", id)))
    }

    /// Replace a schedule's fields; status is kept when omitted
    pub async fn update(&self, id: i64, dto: ScheduleFormDto) -> Result<ScheduleResponseDto> {
        self.ensure_project_exists(dto.project_id).await?;

        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET title = $2, description = $3, project_id = $4, scheduled_at = $5,
                ends_at = $6, status = COALESCE($7, status), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.project_id)
        .bind(dto.scheduled_at)
        .bind(dto.ends_at)
        .bind(dto.status)
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Schedule with id {} not found",
                id
            )));
        }

        tracing::info!("Schedule {} updated", id);
        self.find_with_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Schedule with id {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Schedule with id {} not found",
                id
            )));
        }

        tracing::info!("Schedule {} deleted", id);
        Ok(())
    }

    /// Substring match on title
    pub async fn search(&self, term: &str, limit: i64) -> Result<Vec<Schedule>> {
        let sql = format!(
            "SELECT {} FROM schedules s WHERE s.title ILIKE $1 ORDER BY s.scheduled_at, s.id LIMIT $2",
            SCHEDULE_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(contains_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search schedules: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM schedules")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn ensure_project_exists(&self, project_id: i64) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)")
                .bind(project_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if exists {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "project_id: project {} does not exist",
                project_id
            )))
        }
    }
}
