//! HTTP Request/Response Types
//!
//! Entries serialize straight from `QueueEntry`; join bodies deserialize into
//! the core `JoinRequest`.

use serde::{Deserialize, Serialize};
use waitline_core::domain::QueueEntry;

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// POST /queue - created entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub message: String,
    pub data: QueueEntry,
}

/// Error body for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
