//! HTTP Error Types
//!
//! Maps application errors to status codes and `{"detail": ...}` bodies.

use crate::types::ErrorBody;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::error;
use waitline_core::domain::DomainError;
use waitline_core::error::AppError;

/// Client-facing messages
pub mod detail {
    pub const QUEUE_EMPTY: &str = "No people in line";
    pub const ENTRY_NOT_FOUND: &str = "Person does not exist";
    pub const ALREADY_IN_LINE: &str = "Person is already in line";
    pub const INVALID_CLASS: &str =
        "Invalid class, choose P for preferential or N for normal";
    pub const CANNOT_ADVANCE: &str =
        "No people in line or invalid class, choose P for preferential or N for normal";
    pub const CANNOT_REMOVE: &str = "Person does not exist or was already served";
    pub const FORBIDDEN: &str = "Could not validate credentials";
    pub const STORAGE: &str = "Storage failure";
    pub const NOT_FOUND: &str = "Not Found";
    pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
}

/// Error returned by request handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, detail::FORBIDDEN)
    }

    /// PUT /queue/{class}: invalid class and empty class share one message
    pub fn for_advance(err: AppError) -> Self {
        match err {
            AppError::Domain(DomainError::InvalidClass(_) | DomainError::EmptyClass(_)) => {
                Self::new(StatusCode::BAD_REQUEST, detail::CANNOT_ADVANCE)
            }
            other => other.into(),
        }
    }

    /// DELETE /queue/{id}: absent and already served share one message
    pub fn for_remove(err: AppError) -> Self {
        match err {
            AppError::Domain(DomainError::EntryNotFound(_) | DomainError::AlreadyServed(_)) => {
                Self::new(StatusCode::NOT_FOUND, detail::CANNOT_REMOVE)
            }
            other => other.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Domain(e) => match e {
                DomainError::InvalidClass(_) => {
                    Self::new(StatusCode::BAD_REQUEST, detail::INVALID_CLASS)
                }
                DomainError::DuplicateId(_) => {
                    Self::new(StatusCode::BAD_REQUEST, detail::ALREADY_IN_LINE)
                }
                DomainError::EmptyClass(_) => {
                    Self::new(StatusCode::BAD_REQUEST, detail::CANNOT_ADVANCE)
                }
                DomainError::EntryNotFound(_) => {
                    Self::new(StatusCode::NOT_FOUND, detail::ENTRY_NOT_FOUND)
                }
                DomainError::AlreadyServed(_) => {
                    Self::new(StatusCode::NOT_FOUND, detail::CANNOT_REMOVE)
                }
                DomainError::QueueEmpty => Self::new(StatusCode::NOT_FOUND, detail::QUEUE_EMPTY),
            },
            AppError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            AppError::Database(msg) => {
                error!(error = %msg, "Storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail::STORAGE)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

/// Server lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
