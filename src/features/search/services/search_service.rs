use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::CategoryService;
use crate::features::projects::ProjectService;
use crate::features::schedules::ScheduleService;
use crate::features::search::dtos::SearchResults;

/// Substring search over categories, projects and schedules
pub struct SearchService {
    categories: Arc<CategoryService>,
    projects: Arc<ProjectService>,
    schedules: Arc<ScheduleService>,
}

impl SearchService {
    pub fn new(
        categories: Arc<CategoryService>,
        projects: Arc<ProjectService>,
        schedules: Arc<ScheduleService>,
    ) -> Self {
        Self {
            categories,
            projects,
            schedules,
        }
    }

    /// Run the three searches concurrently, each capped at `limit`
    pub async fn search(&self, term: &str, limit: i64) -> Result<SearchResults> {
        let (categories, projects, schedules) = tokio::try_join!(
            self.categories.search(term, limit),
            self.projects.search(term, limit),
            self.schedules.search(term, limit),
        )?;

        Ok(SearchResults {
            categories: categories.into_iter().map(Into::into).collect(),
            projects: projects.into_iter().map(Into::into).collect(),
            schedules: schedules.into_iter().map(Into::into).collect(),
        })
    }
}
