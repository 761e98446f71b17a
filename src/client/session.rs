//! Client session store
//!
//! An explicit session object owning the token lifecycle: durable storage,
//! the three-state machine, and the auth calls behind it. Nothing here is
//! global; frontends construct one session and pass it where needed.

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::models::user::{LoginRequest, RegisterRequest, UserProfile};

use super::http::{ApiClient, ClientResult};

/// Auth operations the session depends on
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Authenticate and return the issued token
    async fn login(&self, email: &str, password: &str) -> ClientResult<String>;

    /// Register and return the new profile with its token
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ClientResult<(UserProfile, String)>;

    async fn logout(&self) -> ClientResult<()>;

    async fn me(&self) -> ClientResult<UserProfile>;

    /// Attach or detach the bearer token used by subsequent calls
    fn set_token(&self, token: Option<String>);
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let response = ApiClient::login(
            self,
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await?;
        Ok(response.token)
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ClientResult<(UserProfile, String)> {
        let response = ApiClient::register(
            self,
            &RegisterRequest {
                name: Some(name.to_string()),
                email: Some(email.to_string()),
                password: Some(password.to_string()),
                password_confirmation: Some(password_confirmation.to_string()),
            },
        )
        .await?;
        Ok((UserProfile::from(response.user), response.token))
    }

    async fn logout(&self) -> ClientResult<()> {
        ApiClient::logout(self).await.map(|_| ())
    }

    async fn me(&self) -> ClientResult<UserProfile> {
        ApiClient::me(self).await
    }

    fn set_token(&self, token: Option<String>) {
        ApiClient::set_token(self, token)
    }
}

/// Durable storage for the session token
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// Token storage backed by a single file
///
/// Storage failures are logged and otherwise ignored; a missing or unreadable
/// file behaves like an absent token.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Option<String> {
        let token = std::fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn store(&self, token: &str) {
        if let Err(e) = std::fs::write(&self.path, token) {
            tracing::warn!("Failed to persist session token: {}", e);
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to clear session token: {}", e);
            }
        }
    }
}

/// In-memory token storage
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: RwLock<Option<String>>,
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn store(&self, token: &str) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.to_string());
    }

    fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

/// Session states
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No token held
    Unauthenticated,
    /// Token present, profile fetch in flight
    Loading,
    /// Token and resolved profile
    Authenticated { user: UserProfile },
}

/// Session store driving the auth lifecycle
pub struct Session<A: AuthApi, S: TokenStorage> {
    api: A,
    storage: S,
    state: SessionState,
}

impl<A: AuthApi, S: TokenStorage> Session<A, S> {
    pub fn new(api: A, storage: S) -> Self {
        Self {
            api,
            storage,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether protected views may render; callers redirect to login otherwise
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// Resolve a previously stored token at startup
    ///
    /// A stored token moves the session through Loading while the profile is
    /// fetched; a failed fetch clears the token and falls back to
    /// Unauthenticated.
    pub async fn initialize(&mut self) {
        let Some(token) = self.storage.load() else {
            self.state = SessionState::Unauthenticated;
            return;
        };

        self.api.set_token(Some(token));
        self.state = SessionState::Loading;

        match self.api.me().await {
            Ok(user) => {
                self.state = SessionState::Authenticated { user };
            }
            Err(e) => {
                tracing::debug!("Stored token rejected: {}", e);
                self.storage.clear();
                self.api.set_token(None);
                self.state = SessionState::Unauthenticated;
            }
        }
    }

    /// Log in and persist the issued token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<()> {
        let token = self.api.login(email, password).await?;
        self.storage.store(&token);
        self.api.set_token(Some(token));

        let user = self.api.me().await?;
        self.state = SessionState::Authenticated { user };
        Ok(())
    }

    /// Register, persist the issued token and authenticate immediately
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> ClientResult<()> {
        let (user, token) = self
            .api
            .register(name, email, password, password_confirmation)
            .await?;
        self.storage.store(&token);
        self.api.set_token(Some(token));
        self.state = SessionState::Authenticated { user };
        Ok(())
    }

    /// Tear down the session
    ///
    /// The server call is best-effort: its failure is logged and never blocks
    /// the local transition to Unauthenticated.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!("Logout request failed: {}", e);
        }

        self.storage.clear();
        self.api.set_token(None);
        self.state = SessionState::Unauthenticated;
    }
}
