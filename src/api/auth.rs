//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::user::{
        LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserProfile,
    },
};

use super::{AuthenticatedUser, MessageResponse};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 422, description = "Validation failed", body = crate::error::ValidationErrorBody)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let (user, token) = state.services.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::AuthErrorBody)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let token = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(LoginResponse { token }))
}

/// Log out the authenticated user
///
/// Tokens are stateless; the endpoint confirms the token was valid and the
/// caller discards it locally.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(AuthenticatedUser(claims): AuthenticatedUser) -> Json<MessageResponse> {
    tracing::debug!("User id={} logged out", claims.user_id);
    Json(MessageResponse::new("Successfully logged out"))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserProfile>> {
    let profile = state.services.auth.profile(claims.user_id).await?;
    Ok(Json(profile))
}
