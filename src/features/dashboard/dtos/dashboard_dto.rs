use serde::Serialize;
use utoipa::ToSchema;

use crate::features::categories::dtos::CategoryWithCountDto;
use crate::features::comments::dtos::RecentCommentDto;
use crate::features::visitors::dtos::VisitorStatsDto;

/// Number of rows per content table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContentTotalsDto {
    pub projects: i64,
    pub categories: i64,
    pub schedules: i64,
    pub comments: i64,
}

/// Admin dashboard landing data
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardOverviewDto {
    pub visitors: VisitorStatsDto,
    pub popular_categories: Vec<CategoryWithCountDto>,
    pub totals: ContentTotalsDto,
    pub recent_comments: Vec<RecentCommentDto>,
}
