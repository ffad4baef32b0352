use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::categories::models::Category;
use crate::features::projects::models::Project;
use crate::features::schedules::models::Schedule;
use crate::shared::constants::{SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT, SEARCH_MIN_QUERY_CHARS};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Text to look for; fewer than 2 characters returns nothing
    pub query: Option<String>,
    /// Hits per entity type (1-50, default 6)
    pub limit: Option<i64>,
}

impl SearchQuery {
    /// Trimmed search term, `None` when too short to search
    pub fn term(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| q.chars().count() >= SEARCH_MIN_QUERY_CHARS)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(SEARCH_DEFAULT_LIMIT)
            .clamp(1, SEARCH_MAX_LIMIT)
    }
}

/// One search result, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchHit {
    Category {
        id: i64,
        title: String,
        slug: Option<String>,
    },
    #[serde(rename = "product")]
    Project {
        id: i64,
        title: String,
        slug: String,
        image: Option<String>,
    },
    Schedule {
        id: i64,
        title: String,
        date: DateTime<Utc>,
    },
}

impl From<Category> for SearchHit {
    fn from(c: Category) -> Self {
        SearchHit::Category {
            id: c.id,
            title: c.name,
            slug: c.slug,
        }
    }
}

impl From<Project> for SearchHit {
    fn from(p: Project) -> Self {
        SearchHit::Project {
            id: p.id,
            title: p.title,
            slug: p.slug,
            image: p.image,
        }
    }
}

impl From<Schedule> for SearchHit {
    fn from(s: Schedule) -> Self {
        SearchHit::Schedule {
            id: s.id,
            title: s.title,
            date: s.scheduled_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResults {
    pub categories: Vec<SearchHit>,
    pub projects: Vec<SearchHit>,
    pub schedules: Vec<SearchHit>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(q: Option<&str>, limit: Option<i64>) -> SearchQuery {
        SearchQuery {
            query: q.map(str::to_string),
            limit,
        }
    }

    #[test]
    fn test_term_requires_two_characters() {
        assert_eq!(query(None, None).term(), None);
        assert_eq!(query(Some(""), None).term(), None);
        assert_eq!(query(Some(" a "), None).term(), None);
        assert_eq!(query(Some(" ab "), None).term(), Some("ab"));
        // counted in characters, not bytes
        assert_eq!(query(Some("é"), None).term(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(query(None, None).limit(), SEARCH_DEFAULT_LIMIT);
        assert_eq!(query(None, Some(0)).limit(), 1);
        assert_eq!(query(None, Some(500)).limit(), SEARCH_MAX_LIMIT);
    }

    #[test]
    fn test_hits_are_tagged_by_type() {
        let hit = SearchHit::Project {
            id: 2,
            title: "Shop".to_string(),
            slug: "shop".to_string(),
            image: None,
        };
        assert_eq!(
            serde_json::to_value(&hit).unwrap(),
            json!({"type": "product", "id": 2, "title": "Shop", "slug": "shop", "image": null})
        );

        let hit = SearchHit::Category {
            id: 1,
            title: "Web".to_string(),
            slug: Some("web".to_string()),
        };
        assert_eq!(serde_json::to_value(&hit).unwrap()["type"], "category");
    }
}
