//! Framedrop Core Library
//!
//! This crate provides the shared domain types for the framedrop upload
//! nodes: the error taxonomy, the upload payload/receipt models, MIME
//! resolution, and the per-call upload target configuration.

pub mod error;
pub mod mime;
pub mod models;
pub mod target;

// Re-export commonly used types
pub use error::{classify_failure_status, UploadError};
pub use models::{ErrorBody, UploadPayload, UploadReceipt};
pub use target::{
    UploadTarget, DEFAULT_TIMEOUT_SECS, IMAGE_TIMEOUT_SECS, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
