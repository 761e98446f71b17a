//! HTTP plumbing for the Shelfmark API client

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    author::{Author, CreateAuthor, UpdateAuthor},
    book::{Book, CreateBook, UpdateBook},
    pagination::Paginated,
    publisher::{CreatePublisher, Publisher, UpdatePublisher},
    user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserProfile},
};

/// Error payload resolved once at the API boundary
///
/// The wire shape varies by error class: validation failures carry `errors`
/// keyed by field, everything else carries `error` or `message`. Callers only
/// ever see this tagged form.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// Field-keyed validation messages from a 422 response
    Validation(BTreeMap<String, Vec<String>>),
    /// Single human-readable message
    Message(String),
}

impl ErrorPayload {
    /// Resolve a raw error body into its tagged form
    pub fn from_body(body: &Value) -> Self {
        if let Some(errors) = body.get("errors").and_then(Value::as_object) {
            let mut fields = BTreeMap::new();
            for (field, messages) in errors {
                let messages = match messages {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect(),
                    Value::String(message) => vec![message.clone()],
                    _ => Vec::new(),
                };
                fields.insert(field.clone(), messages);
            }
            return ErrorPayload::Validation(fields);
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("error").and_then(Value::as_str))
            .unwrap_or("An unexpected error occurred");
        ErrorPayload::Message(message.to_string())
    }

    /// Join everything into one displayable line
    pub fn display_message(&self) -> String {
        match self {
            ErrorPayload::Message(message) => message.clone(),
            ErrorPayload::Validation(fields) => {
                let messages: Vec<String> = fields.values().flatten().cloned().collect();
                if messages.is_empty() {
                    "An unexpected error occurred".to_string()
                } else {
                    messages.join(" ")
                }
            }
        }
    }
}

/// Client-side error taxonomy
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failed before any response was obtained
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body could not be parsed as the expected structure
    #[error("malformed response from server")]
    MalformedResponse,

    /// The server answered with an error status
    #[error("api error ({status}): {}", .payload.display_message())]
    Api { status: u16, payload: ErrorPayload },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Server confirmation message
#[derive(Debug, Deserialize)]
pub struct ServerMessage {
    pub message: String,
}

/// Catalog totals derived from page-1 list calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub books: i64,
    pub authors: i64,
    pub publishers: i64,
}

/// Book list filters
#[derive(Debug, Default, Clone)]
pub struct BookFilters {
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub publisher_id: Option<i32>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Typed client for the Shelfmark REST API
///
/// Cheap to clone; the bearer token is shared between clones so that a login
/// through one handle authenticates the others.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the bearer token attached to subsequent requests
    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and resolve the response or error payload
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ClientResult<T> {
        let request = match self.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(ClientError::Network)?;
        let status = response.status();

        let body: Value = response
            .json()
            .await
            .map_err(|_| ClientError::MalformedResponse)?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                payload: ErrorPayload::from_body(&body),
            });
        }

        serde_json::from_value(body).map_err(|_| ClientError::MalformedResponse)
    }

    // --- Auth ---

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.send(self.http.post(self.url("/login")).json(request))
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.send(self.http.post(self.url("/register")).json(request))
            .await
    }

    pub async fn logout(&self) -> ClientResult<ServerMessage> {
        self.send(self.http.post(self.url("/logout"))).await
    }

    pub async fn me(&self) -> ClientResult<UserProfile> {
        self.send(self.http.get(self.url("/me"))).await
    }

    // --- Authors ---

    pub async fn list_authors(
        &self,
        page: i64,
        name: Option<&str>,
    ) -> ClientResult<Paginated<Author>> {
        let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
        if let Some(name) = name {
            query.push(("name", name.to_string()));
        }
        self.send(self.http.get(self.url("/authors")).query(&query))
            .await
    }

    pub async fn get_author(&self, id: i32) -> ClientResult<Author> {
        self.send(self.http.get(self.url(&format!("/authors/{}", id))))
            .await
    }

    pub async fn create_author(&self, author: &CreateAuthor) -> ClientResult<Author> {
        self.send(self.http.post(self.url("/authors")).json(author))
            .await
    }

    pub async fn update_author(&self, id: i32, author: &UpdateAuthor) -> ClientResult<Author> {
        self.send(
            self.http
                .put(self.url(&format!("/authors/{}", id)))
                .json(author),
        )
        .await
    }

    pub async fn delete_author(&self, id: i32) -> ClientResult<ServerMessage> {
        self.send(self.http.delete(self.url(&format!("/authors/{}", id))))
            .await
    }

    // --- Publishers ---

    pub async fn list_publishers(
        &self,
        page: i64,
        name: Option<&str>,
    ) -> ClientResult<Paginated<Publisher>> {
        let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
        if let Some(name) = name {
            query.push(("name", name.to_string()));
        }
        self.send(self.http.get(self.url("/publishers")).query(&query))
            .await
    }

    pub async fn get_publisher(&self, id: i32) -> ClientResult<Publisher> {
        self.send(self.http.get(self.url(&format!("/publishers/{}", id))))
            .await
    }

    pub async fn create_publisher(&self, publisher: &CreatePublisher) -> ClientResult<Publisher> {
        self.send(self.http.post(self.url("/publishers")).json(publisher))
            .await
    }

    pub async fn update_publisher(
        &self,
        id: i32,
        publisher: &UpdatePublisher,
    ) -> ClientResult<Publisher> {
        self.send(
            self.http
                .put(self.url(&format!("/publishers/{}", id)))
                .json(publisher),
        )
        .await
    }

    pub async fn delete_publisher(&self, id: i32) -> ClientResult<ServerMessage> {
        self.send(self.http.delete(self.url(&format!("/publishers/{}", id))))
            .await
    }

    // --- Books ---

    pub async fn list_books(
        &self,
        page: i64,
        filters: &BookFilters,
    ) -> ClientResult<Paginated<Book>> {
        let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
        if let Some(ref title) = filters.title {
            query.push(("title", title.clone()));
        }
        if let Some(author_id) = filters.author_id {
            query.push(("author_id", author_id.to_string()));
        }
        if let Some(publisher_id) = filters.publisher_id {
            query.push(("publisher_id", publisher_id.to_string()));
        }
        if let Some(ref sort_by) = filters.sort_by {
            query.push(("sort_by", sort_by.clone()));
        }
        if let Some(ref order) = filters.order {
            query.push(("order", order.clone()));
        }
        self.send(self.http.get(self.url("/books")).query(&query))
            .await
    }

    pub async fn get_book(&self, id: i32) -> ClientResult<Book> {
        self.send(self.http.get(self.url(&format!("/books/{}", id))))
            .await
    }

    pub async fn create_book(&self, book: &CreateBook) -> ClientResult<Book> {
        self.send(self.http.post(self.url("/books")).json(book)).await
    }

    pub async fn update_book(&self, id: i32, book: &UpdateBook) -> ClientResult<Book> {
        self.send(
            self.http
                .put(self.url(&format!("/books/{}", id)))
                .json(book),
        )
        .await
    }

    pub async fn delete_book(&self, id: i32) -> ClientResult<ServerMessage> {
        self.send(self.http.delete(self.url(&format!("/books/{}", id))))
            .await
    }

    /// Catalog totals for the dashboard, derived from page-1 list calls
    pub async fn stats(&self) -> ClientResult<CatalogStats> {
        let book_filters = BookFilters::default();
        let (books, authors, publishers) = tokio::try_join!(
            self.list_books(1, &book_filters),
            self.list_authors(1, None),
            self.list_publishers(1, None),
        )?;

        Ok(CatalogStats {
            books: books.total,
            authors: authors.total,
            publishers: publishers.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_payload_resolved() {
        let body = json!({"errors": {"name": ["The name field is required."]}});
        let payload = ErrorPayload::from_body(&body);
        match payload {
            ErrorPayload::Validation(ref fields) => {
                assert_eq!(fields["name"], vec!["The name field is required."]);
            }
            _ => panic!("expected validation payload"),
        }
        assert_eq!(payload.display_message(), "The name field is required.");
    }

    #[test]
    fn test_single_error_field_resolved() {
        let body = json!({"error": "Invalid credentials"});
        assert_eq!(
            ErrorPayload::from_body(&body),
            ErrorPayload::Message("Invalid credentials".to_string())
        );
    }

    #[test]
    fn test_message_field_resolved() {
        let body = json!({"message": "Author deleted"});
        assert_eq!(
            ErrorPayload::from_body(&body),
            ErrorPayload::Message("Author deleted".to_string())
        );
    }

    #[test]
    fn test_unrecognized_body_falls_back_to_generic() {
        let body = json!({"weird": true});
        assert_eq!(
            ErrorPayload::from_body(&body),
            ErrorPayload::Message("An unexpected error occurred".to_string())
        );
    }

    #[test]
    fn test_validation_messages_joined_for_display() {
        let body = json!({"errors": {
            "author_id": ["The selected author_id is invalid."],
            "title": ["The title field is required."]
        }});
        let payload = ErrorPayload::from_body(&body);
        assert_eq!(
            payload.display_message(),
            "The selected author_id is invalid. The title field is required."
        );
    }
}
