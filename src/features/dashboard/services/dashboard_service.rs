use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::categories::CategoryService;
use crate::features::comments::CommentService;
use crate::features::dashboard::dtos::{ContentTotalsDto, DashboardOverviewDto};
use crate::features::projects::ProjectService;
use crate::features::schedules::ScheduleService;
use crate::features::visitors::dtos::VisitorLogResponseDto;
use crate::features::visitors::VisitorService;
use crate::shared::constants::{POPULAR_CATEGORIES_LIMIT, RECENT_COMMENTS_LIMIT};
use crate::shared::types::PaginationQuery;

/// Read-only aggregates for the admin dashboard
pub struct DashboardService {
    categories: Arc<CategoryService>,
    projects: Arc<ProjectService>,
    schedules: Arc<ScheduleService>,
    comments: Arc<CommentService>,
    visitors: Arc<VisitorService>,
}

impl DashboardService {
    pub fn new(
        categories: Arc<CategoryService>,
        projects: Arc<ProjectService>,
        schedules: Arc<ScheduleService>,
        comments: Arc<CommentService>,
        visitors: Arc<VisitorService>,
    ) -> Self {
        Self {
            categories,
            projects,
            schedules,
            comments,
            visitors,
        }
    }

    pub async fn totals(&self) -> Result<ContentTotalsDto> {
        let (projects, categories, schedules, comments) = tokio::try_join!(
            self.projects.count(),
            self.categories.count(),
            self.schedules.count(),
            self.comments.count(),
        )?;

        Ok(ContentTotalsDto {
            projects,
            categories,
            schedules,
            comments,
        })
    }

    /// Snapshot taken at `now`; the per-day chart spans `days` days
    pub async fn overview(&self, now: DateTime<Utc>, days: i64) -> Result<DashboardOverviewDto> {
        let (visitors, popular_categories, totals, recent_comments) = tokio::try_join!(
            self.visitors.stats(now, days),
            self.categories.popular(POPULAR_CATEGORIES_LIMIT),
            self.totals(),
            self.comments.recent(RECENT_COMMENTS_LIMIT),
        )?;

        Ok(DashboardOverviewDto {
            visitors,
            popular_categories,
            totals,
            recent_comments,
        })
    }

    /// Returns (logs, total_count)
    pub async fn visitor_logs(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<VisitorLogResponseDto>, i64)> {
        self.visitors.logs(pagination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::visitors::{VisitContext, VisitMetadata};
    use crate::modules::storage::memory::MemoryStorage;
    use sqlx::PgPool;

    fn service(pool: &PgPool) -> DashboardService {
        DashboardService::new(
            Arc::new(CategoryService::new(pool.clone())),
            Arc::new(ProjectService::new(
                pool.clone(),
                Arc::new(MemoryStorage::default()),
            )),
            Arc::new(ScheduleService::new(pool.clone())),
            Arc::new(CommentService::new(pool.clone())),
            Arc::new(VisitorService::new(pool.clone())),
        )
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_overview_on_empty_store(pool: PgPool) {
        let overview = service(&pool).overview(Utc::now(), 7).await.unwrap();

        assert_eq!(
            overview.totals,
            ContentTotalsDto {
                projects: 0,
                categories: 0,
                schedules: 0,
                comments: 0,
            }
        );
        assert_eq!(overview.visitors.total, 0);
        assert!(overview.popular_categories.is_empty());
        assert!(overview.recent_comments.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_overview_counts_visits(pool: PgPool) {
        let visitors = VisitorService::new(pool.clone());
        for _ in 0..3 {
            visitors
                .record_visit(&VisitContext::default(), "/", &VisitMetadata::new())
                .await
                .unwrap();
        }

        let overview = service(&pool).overview(Utc::now(), 30).await.unwrap();
        let v = &overview.visitors;
        assert_eq!(v.total, 3);
        assert!(v.today <= v.week && v.week <= v.month && v.month <= v.total);
        assert_eq!(v.days, 30);
    }
}
