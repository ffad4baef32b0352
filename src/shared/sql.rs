//! Helpers for composing runtime SQL with positional binds.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::shared::validation::slug_lookup_prefix;

/// `%term%` pattern for ILIKE with `\`, `%` and `_` escaped so they match literally
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// A bind value collected while building a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Accumulates `AND`-joined conditions and their positional parameters
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WhereClause {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next positional placeholder (`$1`, `$2`, ...)
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.binds.len() + 1)
    }

    /// Add a condition whose `{}` markers are replaced by the placeholder of `value`
    pub fn push(&mut self, template: &str, value: BindValue) {
        let placeholder = self.next_placeholder();
        self.conditions.push(template.replace("{}", &placeholder));
        self.binds.push(value);
    }

    /// Add a condition using several values, referenced as `{0}`, `{1}`, ...
    pub fn push_all(&mut self, template: &str, values: Vec<BindValue>) {
        let mut condition = template.to_string();
        for (i, value) in values.into_iter().enumerate() {
            let placeholder = self.next_placeholder();
            condition = condition.replace(&format!("{{{}}}", i), &placeholder);
            self.binds.push(value);
        }
        self.conditions.push(condition);
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// `WHERE a AND b`, or an empty string when there are no conditions
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Bind collected values onto a `query_as` in order
pub fn bind_all<'q, O>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for value in binds {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
            BindValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

/// Bind collected values onto a `query_scalar` in order
pub fn bind_all_scalar<'q, O>(
    mut query: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for value in binds {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
            BindValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

/// Existing slugs in `table` that `unique_slug` must avoid for `base`.
///
/// Matches on a shortened prefix so truncated `base-N` candidates are found too;
/// extra rows are harmless because the caller compares exactly.
///
/// `exclude_id` leaves out the row being updated so it can keep its own slug.
pub async fn existing_slugs(
    pool: &PgPool,
    table: &'static str,
    base: &str,
    exclude_id: Option<i64>,
) -> Result<Vec<String>, sqlx::Error> {
    let query = format!(
        "SELECT slug FROM {} WHERE (slug = $1 OR slug LIKE $2) AND ($3::BIGINT IS NULL OR id <> $3)",
        table
    );
    let suffixed = format!("{}%", escape_like(slug_lookup_prefix(base)));

    sqlx::query_scalar::<_, String>(&query)
        .bind(base)
        .bind(suffixed)
        .bind(exclude_id)
        .fetch_all(pool)
        .await
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("web"), "%web%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\dir"), "%c:\\\\dir%");
    }

    #[test]
    fn test_where_clause_numbers_placeholders_in_order() {
        let mut clause = WhereClause::new();
        assert_eq!(clause.to_sql(), "");

        clause.push("p.category_id = {}", BindValue::Int(3));
        clause.push(
            "(p.title ILIKE {} OR p.description ILIKE {})",
            BindValue::Text("%web%".to_string()),
        );

        assert_eq!(
            clause.to_sql(),
            "WHERE p.category_id = $1 AND (p.title ILIKE $2 OR p.description ILIKE $2)"
        );
        assert_eq!(clause.next_placeholder(), "$3");

        let from = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        let to = DateTime::<Utc>::from_timestamp(86_400, 0).unwrap();
        clause.push_all(
            "(s.scheduled_at BETWEEN {0} AND {1})",
            vec![BindValue::Timestamp(from), BindValue::Timestamp(to)],
        );
        assert!(clause.to_sql().ends_with("AND (s.scheduled_at BETWEEN $3 AND $4)"));
        assert_eq!(clause.binds().len(), 4);
        assert_eq!(
            &clause.binds()[..2],
            &[BindValue::Int(3), BindValue::Text("%web%".to_string())]
        );
    }
}
