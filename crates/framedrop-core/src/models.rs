//! Data models for the upload pipeline.

use serde::{Deserialize, Serialize};

/// Normalized file input, ready for the wire: raw bytes plus the filename
/// and content type the multipart part will carry. Constructed per
/// invocation and discarded after the request completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPayload {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl UploadPayload {
    pub fn new(data: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Success response body (200). Both fields are purely informational;
/// absence of either is not an error.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub message: Option<String>,
    pub filename: Option<String>,
}

/// Error response body probe (400 and other failure statuses).
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the `error` field from a JSON body, falling back to the raw
    /// text when the body is not JSON or carries no such field.
    pub fn message_from(raw: &str) -> String {
        serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| raw.to_string())
    }
}
