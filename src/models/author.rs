//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create author request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(
        required(message = "The name field is required."),
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters.")
    )]
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Update author request; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(
        min = 1,
        max = 255,
        message = "The name must be between 1 and 255 characters."
    ))]
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Author list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuthorQuery {
    pub name: Option<String>,
    /// Legacy alias for `name`, kept for backward compatibility
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl AuthorQuery {
    /// Effective name filter; the canonical `name` parameter wins over the
    /// legacy `search` alias when both are supplied.
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().or(self.search.as_deref())
    }
}
