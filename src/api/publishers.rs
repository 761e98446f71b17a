//! Publisher endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        pagination::Paginated,
        publisher::{CreatePublisher, Publisher, PublisherQuery, UpdatePublisher},
    },
};

use super::{AuthenticatedUser, MessageResponse};

/// List publishers with search and pagination
#[utoipa::path(
    get,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(PublisherQuery),
    responses(
        (status = 200, description = "Paginated publishers", body = Paginated<Publisher>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_publishers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PublisherQuery>,
) -> AppResult<Json<Paginated<Publisher>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.limit.unwrap_or(10).clamp(1, 100);

    let (publishers, total) = state.services.publishers.search(&query).await?;

    Ok(Json(Paginated::new(publishers, total, page, per_page)))
}

/// Get publisher details by ID
#[utoipa::path(
    get,
    path = "/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher details", body = Publisher),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn get_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Publisher>> {
    let publisher = state.services.publishers.get(id).await?;
    Ok(Json(publisher))
}

/// Create a new publisher
#[utoipa::path(
    post,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    request_body = CreatePublisher,
    responses(
        (status = 201, description = "Publisher created", body = Publisher),
        (status = 422, description = "Validation failed", body = crate::error::ValidationErrorBody)
    )
)]
pub async fn create_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(publisher): Json<CreatePublisher>,
) -> AppResult<(StatusCode, Json<Publisher>)> {
    let created = state.services.publishers.create(publisher).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing publisher
#[utoipa::path(
    put,
    path = "/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    request_body = UpdatePublisher,
    responses(
        (status = 200, description = "Publisher updated", body = Publisher),
        (status = 404, description = "Publisher not found"),
        (status = 422, description = "Validation failed", body = crate::error::ValidationErrorBody)
    )
)]
pub async fn update_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(publisher): Json<UpdatePublisher>,
) -> AppResult<Json<Publisher>> {
    let updated = state.services.publishers.update(id, publisher).await?;
    Ok(Json(updated))
}

/// Delete a publisher
#[utoipa::path(
    delete,
    path = "/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher deleted", body = MessageResponse),
        (status = 404, description = "Publisher not found"),
        (status = 409, description = "Publisher still has books")
    )
)]
pub async fn delete_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.publishers.delete(id).await?;
    Ok(Json(MessageResponse::new("Publisher deleted")))
}
