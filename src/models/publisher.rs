//! Publisher model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full publisher model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create publisher request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePublisher {
    #[validate(
        required(message = "The name field is required."),
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters.")
    )]
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Update publisher request; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePublisher {
    #[validate(length(
        min = 1,
        max = 255,
        message = "The name must be between 1 and 255 characters."
    ))]
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Publisher list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PublisherQuery {
    pub name: Option<String>,
    /// Legacy alias for `name`, kept for backward compatibility
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PublisherQuery {
    /// Effective name filter; `name` wins over the legacy `search` alias.
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().or(self.search.as_deref())
    }
}
