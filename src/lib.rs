//! Shelfmark Library Catalog Management
//!
//! A Rust REST backend for managing a library catalog (authors, publishers,
//! books) behind a JWT-authenticated JSON API, together with the typed client
//! and session layer used by the frontends.

use std::sync::Arc;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
