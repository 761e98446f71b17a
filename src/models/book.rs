//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{author::Author, publisher::Publisher};

/// Columns accepted by the `sort_by` list parameter
const SORTABLE_COLUMNS: &[&str] = &["id", "title", "author_id", "publisher_id", "created_at"];

/// Full book model with embedded relations
///
/// `author` and `publisher` are hydrated by the repository on reads; book
/// responses always carry both summaries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub author_id: i32,
    pub publisher_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Option<Author>,
    pub publisher: Option<Publisher>,
}

/// Create book request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(
        required(message = "The title field is required."),
        length(min = 1, max = 255, message = "The title must be between 1 and 255 characters.")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(required(message = "The author_id field is required."))]
    pub author_id: Option<i32>,
    #[validate(required(message = "The publisher_id field is required."))]
    pub publisher_id: Option<i32>,
}

/// Update book request; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(
        min = 1,
        max = 255,
        message = "The title must be between 1 and 255 characters."
    ))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_id: Option<i32>,
    pub publisher_id: Option<i32>,
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    pub title: Option<String>,
    /// Legacy alias for `title`, kept for backward compatibility
    pub search: Option<String>,
    pub author_id: Option<i32>,
    pub publisher_id: Option<i32>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl BookQuery {
    /// Effective title filter; `title` wins over the legacy `search` alias.
    pub fn title_filter(&self) -> Option<&str> {
        self.title.as_deref().or(self.search.as_deref())
    }

    /// Sort column restricted to the known set; anything else falls back to id.
    pub fn sort_column(&self) -> &str {
        match self.sort_by.as_deref() {
            Some(column) if SORTABLE_COLUMNS.contains(&column) => column,
            _ => "id",
        }
    }

    /// Sort direction, ascending unless `desc` is requested.
    pub fn sort_direction(&self) -> &'static str {
        match self.order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("desc") => "DESC",
            _ => "ASC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_wins_over_search() {
        let query = BookQuery {
            title: Some("Dune".to_string()),
            search: Some("Foundation".to_string()),
            ..Default::default()
        };
        assert_eq!(query.title_filter(), Some("Dune"));
    }

    #[test]
    fn test_sort_column_whitelist() {
        let mut query = BookQuery {
            sort_by: Some("title".to_string()),
            ..Default::default()
        };
        assert_eq!(query.sort_column(), "title");

        query.sort_by = Some("1; DROP TABLE books".to_string());
        assert_eq!(query.sort_column(), "id");

        query.sort_by = None;
        assert_eq!(query.sort_column(), "id");
    }

    #[test]
    fn test_sort_direction_defaults_ascending() {
        let mut query = BookQuery::default();
        assert_eq!(query.sort_direction(), "ASC");

        query.order = Some("DESC".to_string());
        assert_eq!(query.sort_direction(), "DESC");

        query.order = Some("sideways".to_string());
        assert_eq!(query.sort_direction(), "ASC");
    }
}
