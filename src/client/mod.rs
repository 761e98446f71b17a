//! API client and session layer for Shelfmark frontends
//!
//! The non-UI core of the single-page client: typed HTTP access with error
//! shapes resolved at the boundary, a durable token store driving the session
//! state machine, and the view-model state behind the list and detail
//! screens.

pub mod http;
pub mod session;
pub mod views;

pub use http::{ApiClient, BookFilters, CatalogStats, ClientError, ClientResult, ErrorPayload};
pub use session::{FileTokenStorage, Session, SessionState, TokenStorage};
pub use views::{DetailForm, DetailTarget, FetchTicket, FormMode, ListState};
