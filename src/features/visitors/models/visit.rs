use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Longest path stored in the visitor log (`visitor_logs.path`)
pub const MAX_LOGGED_PATH_CHARS: usize = 2048;

/// Canonical text form of an IP address, or `None` when `raw` is not one
pub fn normalize_ip(raw: &str) -> Option<String> {
    raw.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

/// Who is making a request, as far as the visitor log cares.
///
/// Built per request by its extractor and passed explicitly to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitContext {
    pub user_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        MetadataValue::Bool(v)
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Int(v)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        MetadataValue::Text(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::Text(v.to_string())
    }
}

/// Extra facts attached to a visit, e.g. which project was viewed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitMetadata(BTreeMap<String, MetadataValue>);

impl VisitMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<MetadataValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Like `with`, skipping absent values
    pub fn with_opt<V: Into<MetadataValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// JSON object for the `metadata` column; `None` stores NULL
    pub fn to_json(&self) -> Option<Value> {
        if self.0.is_empty() {
            return None;
        }
        serde_json::to_value(&self.0).ok()
    }
}

/// Database model for visitor log
#[derive(Debug, Clone, FromRow)]
pub struct VisitorLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub path: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<Value>,
    pub visited_at: DateTime<Utc>,
}

/// Visitor log joined with the visiting user's name, if any
#[derive(Debug, Clone, FromRow)]
pub struct VisitorLogWithUser {
    #[sqlx(flatten)]
    pub log: VisitorLog,
    pub user_name: Option<String>,
}

/// Aggregate visit counts over fixed windows
#[derive(Debug, Clone, Copy, FromRow)]
pub struct VisitCounts {
    pub total: i64,
    pub today: i64,
    pub week: i64,
    pub month: i64,
}
