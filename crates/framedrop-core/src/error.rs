//! Error types module
//!
//! All failure categories of an upload invocation are unified under the
//! `UploadError` enum: input problems caught before any I/O, transport
//! failures, and non-200 HTTP classifications. One invocation produces at
//! most one of these; there are no retries anywhere in the pipeline.

use std::io;

use crate::models::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Bad or missing caller input, detected before any encoding or I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input shape the normalizer cannot interpret.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Path does not exist: {0}")]
    FileNotFound(String),

    #[error("Image encoding error: {0}")]
    ImageEncoding(String),

    /// Connection refused, DNS failure, reset, or any other transport
    /// failure that is not a timeout.
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Upload timeout after {0}s")]
    Timeout(u64),

    /// API key rejected (401).
    #[error("API key rejected (401)")]
    Unauthorized,

    /// Request rejected by server-side validation (400).
    #[error("Request rejected (400): {0}")]
    Rejected(String),

    /// Any other non-200 status.
    #[error("Upload failed [{status}]: {body}")]
    Server { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl UploadError {
    /// Whether the failure happened before any network activity.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            UploadError::InvalidInput(_)
                | UploadError::UnsupportedInput(_)
                | UploadError::FileNotFound(_)
                | UploadError::ImageEncoding(_)
                | UploadError::Io(_)
        )
    }
}

/// Classify a non-200 response into the error taxonomy.
///
/// 401 ignores the body entirely. 400 prefers the JSON `error` field and
/// falls back to the raw text. Everything else keeps the status code and
/// the body (same `error`-field preference) as opaque diagnostics.
pub fn classify_failure_status(status: u16, body: &str) -> UploadError {
    match status {
        401 => UploadError::Unauthorized,
        400 => UploadError::Rejected(ErrorBody::message_from(body)),
        _ => UploadError::Server {
            status,
            body: ErrorBody::message_from(body),
        },
    }
}
