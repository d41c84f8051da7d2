//! Minimal PostgREST read-query builder.
//!
//! Covers what the page needs: a column projection (including embedded
//! resources) and equality filters.

use std::fmt::Display;

/// A `GET /rest/v1/{table}` read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
}

impl Select {
    /// Read every column of `table`.
    #[must_use]
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
        }
    }

    /// Set the projection. Whitespace outside double quotes is dropped, so
    /// `"*, questions(*, author_id(email, username))"` is accepted.
    #[must_use]
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = compact_columns(columns);
        self
    }

    /// Add a `column=eq.value` filter.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Path and query string, relative to the REST root.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        let mut out = format!(
            "{}?select={}",
            urlencoding::encode(&self.table),
            urlencoding::encode(&self.columns)
        );
        for (column, filter) in &self.filters {
            out.push('&');
            out.push_str(&urlencoding::encode(column));
            out.push('=');
            out.push_str(&urlencoding::encode(filter));
        }
        out
    }
}

fn compact_columns(columns: &str) -> String {
    let mut quoted = false;
    columns
        .chars()
        .filter(|ch| {
            if *ch == '"' {
                quoted = !quoted;
            }
            quoted || !ch.is_whitespace()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_projection_is_star() {
        assert_eq!(Select::from("users").path_and_query(), "users?select=%2A");
    }

    #[test]
    fn eq_filter_value_is_encoded() {
        let q = Select::from("users").eq("email", "a+b@x.com");
        assert_eq!(
            q.path_and_query(),
            "users?select=%2A&email=eq.a%2Bb%40x.com"
        );
    }

    #[test]
    fn embedded_projection_is_compacted_and_encoded() {
        let q = Select::from("subjects")
            .columns("*, questions(*, author_id(email, username))")
            .eq("org_id", 7);
        assert_eq!(
            q.path_and_query(),
            "subjects?select=%2A%2Cquestions%28%2A%2Cauthor_id%28email%2Cusername%29%29&org_id=eq.7"
        );
    }

    #[test]
    fn whitespace_inside_quotes_is_kept() {
        assert_eq!(compact_columns(r#"id, "full name""#), r#"id,"full name""#);
    }
}
