//! HTTP Request Handlers
//!
//! Thin translation between HTTP and `QueueService` calls.

use crate::error::{detail, ApiError};
use crate::extract::{ApiJson, ApiPath};
use crate::server::AppState;
use crate::types::{JoinResponse, MessageResponse};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use waitline_core::application::JoinRequest;
use waitline_core::domain::{EntryId, QueueEntry};

/// GET / - liveness, no credential required
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse::new("Waitline API"))
}

/// GET /queue
pub async fn list_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<QueueEntry>>, ApiError> {
    let entries = state.service.list_active().await?;
    Ok(Json(entries))
}

/// GET /queue/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntryId>,
) -> Result<Json<QueueEntry>, ApiError> {
    let entry = state.service.get(id).await?;
    Ok(Json(entry))
}

/// POST /queue
pub async fn join(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<JoinRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), ApiError> {
    let entry = state.service.join(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            message: "Person added to the line".to_string(),
            data: entry,
        }),
    ))
}

/// PUT /queue/{class_code}
pub async fn advance(
    State(state): State<AppState>,
    ApiPath(class_code): ApiPath<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .advance(&class_code)
        .await
        .map_err(ApiError::for_advance)?;

    Ok(Json(MessageResponse::new("Line updated")))
}

/// DELETE /queue/{id}
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntryId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .remove(id)
        .await
        .map_err(ApiError::for_remove)?;

    Ok(Json(MessageResponse::new("Person removed from the line")))
}

/// Unknown route
pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, detail::NOT_FOUND)
}

/// Known route, unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, detail::METHOD_NOT_ALLOWED)
}
