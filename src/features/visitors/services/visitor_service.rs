use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::visitors::dtos::{
    DateCountDto, PathCountDto, VisitorLogResponseDto, VisitorStatsDto,
};
use crate::features::visitors::models::{
    normalize_ip, VisitContext, VisitCounts, VisitMetadata, VisitorLogWithUser,
    MAX_LOGGED_PATH_CHARS,
};
use crate::shared::constants::VISITOR_CHART_MAX_DAYS;
use crate::shared::types::PaginationQuery;

/// Time boundaries of a statistics snapshot taken at `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub today: NaiveDate,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
    /// Midnight UTC `days` days before `now`
    pub chart_start: DateTime<Utc>,
    pub days: i64,
}

impl StatsWindow {
    pub fn new(now: DateTime<Utc>, days: i64) -> Self {
        let days = days.clamp(1, VISITOR_CHART_MAX_DAYS);
        let chart_start = (now - Duration::days(days))
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();

        Self {
            today: now.date_naive(),
            week_start: now - Duration::days(7),
            month_start: now - Duration::days(30),
            chart_start,
            days,
        }
    }
}

pub struct VisitorService {
    pool: PgPool,
}

impl VisitorService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one visitor log row.
    ///
    /// A user id with no matching user, an address that is not an IP and an
    /// over-long path are stored as NULL, NULL and truncated respectively, so
    /// every call that reaches the store logs exactly one row.
    pub async fn record_visit(
        &self,
        ctx: &VisitContext,
        path: &str,
        metadata: &VisitMetadata,
    ) -> Result<()> {
        let path: String = path.chars().take(MAX_LOGGED_PATH_CHARS).collect();
        let ip = ctx.ip.as_deref().and_then(normalize_ip);

        sqlx::query(
            r#"
            INSERT INTO visitor_logs (user_id, path, ip_address, user_agent, metadata, visited_at)
            VALUES ((SELECT id FROM users WHERE id = $1), $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(ctx.user_id)
        .bind(&path)
        .bind(ip)
        .bind(&ctx.user_agent)
        .bind(metadata.to_json())
        .execute(&self.pool)
        .await
        .map_err(handle_db_error)?;

        Ok(())
    }

    /// Record a visit from a public page; failures are logged, never returned
    pub async fn record_visit_or_warn(
        &self,
        ctx: &VisitContext,
        path: &str,
        metadata: VisitMetadata,
    ) {
        if let Err(e) = self.record_visit(ctx, path, &metadata).await {
            tracing::warn!("Failed to record visit to {}: {}", path, e);
        }
    }

    pub async fn stats(&self, now: DateTime<Utc>, days: i64) -> Result<VisitorStatsDto> {
        let window = StatsWindow::new(now, days);

        let counts: VisitCounts = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE (visited_at AT TIME ZONE 'UTC')::date = $1) AS today,
                COUNT(*) FILTER (WHERE visited_at >= $2) AS week,
                COUNT(*) FILTER (WHERE visited_at >= $3) AS month
            FROM visitor_logs
            "#,
        )
        .bind(window.today)
        .bind(window.week_start)
        .bind(window.month_start)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count visits: {:?}", e);
            AppError::Database(e)
        })?;

        let by_path: Vec<PathCountDto> = sqlx::query_as(
            r#"
            SELECT path, COUNT(*) AS count
            FROM visitor_logs
            GROUP BY path
            ORDER BY count DESC, path ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count visits by path: {:?}", e);
            AppError::Database(e)
        })?;

        let by_date: Vec<DateCountDto> = sqlx::query_as(
            r#"
            SELECT (visited_at AT TIME ZONE 'UTC')::date AS date, COUNT(*) AS count
            FROM visitor_logs
            WHERE visited_at >= $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(window.chart_start)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count visits by date: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(VisitorStatsDto {
            total: counts.total,
            today: counts.today,
            week: counts.week,
            month: counts.month,
            by_path,
            by_date,
            days: window.days,
        })
    }

    /// Visitor logs, newest first
    /// Returns (logs, total_count)
    pub async fn logs(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<VisitorLogResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visitor_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count visitor logs: {:?}", e);
                AppError::Database(e)
            })?;

        let rows: Vec<VisitorLogWithUser> = sqlx::query_as(
            r#"
            SELECT v.id, v.user_id, v.path, v.ip_address, v.user_agent, v.metadata,
                   v.visited_at, u.name AS user_name
            FROM visitor_logs v
            LEFT JOIN users u ON u.id = v.user_id
            ORDER BY v.visited_at DESC, v.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list visitor logs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stats_window_boundaries() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap();
        let window = StatsWindow::new(now, 7);

        assert_eq!(window.today, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(window.week_start, Utc.with_ymd_and_hms(2025, 3, 3, 15, 30, 0).unwrap());
        assert_eq!(window.month_start, Utc.with_ymd_and_hms(2025, 2, 8, 15, 30, 0).unwrap());
        assert_eq!(window.chart_start, Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
        assert!(window.month_start <= window.week_start);
    }

    #[test]
    fn test_stats_window_clamps_days() {
        let now = Utc::now();
        assert_eq!(StatsWindow::new(now, 0).days, 1);
        assert_eq!(StatsWindow::new(now, -4).days, 1);
        assert_eq!(StatsWindow::new(now, 1000).days, VISITOR_CHART_MAX_DAYS);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_record_visit_inserts_one_row(pool: PgPool) {
        let service = VisitorService::new(pool.clone());

        service
            .record_visit(&VisitContext::default(), "/", &VisitMetadata::new())
            .await
            .unwrap();

        let (logs, total) = service.logs(&PaginationQuery::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(logs[0].path, "/");
        assert_eq!(logs[0].ip_address, None);
        assert_eq!(logs[0].user_agent, None);
        assert_eq!(logs[0].metadata, None);
        assert_eq!(logs[0].user_name, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_record_visit_tolerates_unknown_user_and_bad_address(pool: PgPool) {
        let service = VisitorService::new(pool.clone());

        let long_address = VisitContext {
            user_id: None,
            ip: Some("1".repeat(80)),
            user_agent: Some("agent".to_string()),
        };
        service
            .record_visit(&long_address, "/", &VisitMetadata::new())
            .await
            .unwrap();

        let unknown_user = VisitContext {
            user_id: Some(999),
            ip: Some("198.51.100.7".to_string()),
            user_agent: None,
        };
        service
            .record_visit(&unknown_user, &format!("/{}", "a".repeat(3000)), &VisitMetadata::new())
            .await
            .unwrap();

        let (logs, total) = service.logs(&PaginationQuery::default()).await.unwrap();
        assert_eq!(total, 2);
        let newest = &logs[0];
        assert_eq!(newest.user_id, None);
        assert_eq!(newest.ip_address.as_deref(), Some("198.51.100.7"));
        assert_eq!(newest.path.chars().count(), MAX_LOGGED_PATH_CHARS);
        assert_eq!(logs[1].ip_address, None);
        assert_eq!(logs[1].user_agent.as_deref(), Some("agent"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_record_visit_keeps_known_user(pool: PgPool) {
        let service = VisitorService::new(pool.clone());
        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, email) VALUES ('Rina', 'rina@example.com') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let ctx = VisitContext {
            user_id: Some(user_id),
            ..VisitContext::default()
        };
        service
            .record_visit(&ctx, "/browse", &VisitMetadata::new().with("page", "browse"))
            .await
            .unwrap();

        let (logs, _) = service.logs(&PaginationQuery::default()).await.unwrap();
        assert_eq!(logs[0].user_id, Some(user_id));
        assert_eq!(logs[0].user_name.as_deref(), Some("Rina"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_stats_counts_are_nested(pool: PgPool) {
        let service = VisitorService::new(pool.clone());
        let ctx = VisitContext {
            user_id: None,
            ip: Some("203.0.113.1".to_string()),
            user_agent: Some("test".to_string()),
        };

        for path in ["/", "/browse", "/browse"] {
            service
                .record_visit(&ctx, path, &VisitMetadata::new().with("n", 1_i64))
                .await
                .unwrap();
        }
        for days_ago in [3, 20, 90] {
            sqlx::query(
                "INSERT INTO visitor_logs (path, visited_at) VALUES ('/old', NOW() - make_interval(days => $1))",
            )
            .bind(days_ago)
            .execute(&pool)
            .await
            .unwrap();
        }

        let stats = service.stats(Utc::now(), 7).await.unwrap();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.month, 5);
        assert_eq!(stats.week, 4);
        assert!(stats.today <= stats.week);
        assert!(stats.today >= 3);

        let by_path: Vec<(&str, i64)> = stats
            .by_path
            .iter()
            .map(|p| (p.path.as_str(), p.count))
            .collect();
        assert_eq!(by_path, vec![("/old", 3), ("/browse", 2), ("/", 1)]);
        let dates: Vec<NaiveDate> = stats.by_date.iter().map(|d| d.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }
}
