use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

/// Listing metadata; page fields are present for paginated listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
}

impl Meta {
    pub fn total(total: i64) -> Self {
        Self {
            total,
            page: None,
            page_size: None,
            total_pages: None,
        }
    }

    pub fn paged(total: i64, pagination: &PaginationQuery) -> Self {
        let page_size = pagination.limit();
        Self {
            total,
            page: Some(pagination.page()),
            page_size: Some(page_size),
            total_pages: Some((total + page_size - 1) / page_size),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Page number, never below 1
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// SQL OFFSET for the page; saturates instead of overflowing on huge pages
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

/// Treat blank or whitespace-only query values as absent
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamps() {
        let p = PaginationQuery::new(0, 1000);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 0);

        let p = PaginationQuery::new(3, 12);
        assert_eq!(p.offset(), 24);
        assert_eq!(p.limit(), 12);

        assert_eq!(PaginationQuery::new(1, 0).limit(), 1);
    }

    #[test]
    fn test_offset_saturates_on_huge_pages() {
        let p = PaginationQuery::new(i64::MAX, 12);
        assert_eq!(p.offset(), i64::MAX);

        let p = PaginationQuery::new(i64::MIN, 12);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_meta_total_pages_rounds_up() {
        let meta = Meta::paged(25, &PaginationQuery::new(1, 12));
        assert_eq!(meta.total_pages, Some(3));
        assert_eq!(Meta::paged(0, &PaginationQuery::new(1, 12)).total_pages, Some(0));
        assert_eq!(Meta::paged(24, &PaginationQuery::new(2, 12)).total_pages, Some(2));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" web ")), Some("web"));
    }
}
