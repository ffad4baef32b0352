/// Default page size for dashboard listings
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page size of the public browse listing
pub const BROWSE_PAGE_SIZE: i64 = 12;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// QUERY LIMITS
// =============================================================================

pub const FEATURED_PROJECTS_LIMIT: i64 = 6;
pub const RELATED_PROJECTS_LIMIT: i64 = 3;
pub const UPCOMING_SCHEDULES_LIMIT: i64 = 5;
pub const POPULAR_CATEGORIES_LIMIT: i64 = 6;
pub const RECENT_COMMENTS_LIMIT: i64 = 5;

/// Default number of hits per entity type in cross-entity search
pub const SEARCH_DEFAULT_LIMIT: i64 = 6;
pub const SEARCH_MAX_LIMIT: i64 = 50;
/// Shorter queries return empty results without touching the database
pub const SEARCH_MIN_QUERY_CHARS: usize = 2;

/// Default window of the per-day visitor chart
pub const VISITOR_CHART_DEFAULT_DAYS: i64 = 7;
pub const VISITOR_CHART_MAX_DAYS: i64 = 365;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - manages content through the dashboard
pub const ROLE_ADMIN: &str = "admin";

/// Regular user - may comment on projects
pub const ROLE_USER: &str = "user";
