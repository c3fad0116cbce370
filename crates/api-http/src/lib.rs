//! HTTP API Layer
//!
//! Exposes the queue engine over a JSON request/response boundary guarded by
//! an access gate.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handler;
pub mod server;
pub mod types;

pub use auth::StaticKeyGate;
pub use error::{ApiError, ServerError};
pub use server::{router, AppState, HttpServer, HttpServerConfig};
