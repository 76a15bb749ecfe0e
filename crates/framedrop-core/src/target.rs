//! Per-call upload target configuration.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::UploadError;
use crate::mime;

/// Bounds for the video-path timeout widget.
pub const MIN_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Fixed timeout for the image upload path.
pub const IMAGE_TIMEOUT_SECS: u64 = 30;

/// Where and how to upload: endpoint URL, API key, request timeout, and
/// optional extension → MIME overrides consulted before the built-in table.
/// Immutable for the duration of one upload call.
#[derive(Clone, Debug)]
pub struct UploadTarget {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub mime_overrides: HashMap<String, String>,
}

impl UploadTarget {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            api_key: api_key.into().trim().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            mime_overrides: HashMap::new(),
        }
    }

    /// Set the timeout in whole seconds, clamped to the widget bounds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(clamp_timeout_secs(secs));
        self
    }

    /// Set the timeout without clamping (the image path uses a fixed value
    /// below the video widget's minimum).
    pub fn with_fixed_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mime_override(
        mut self,
        extension: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        self.mime_overrides
            .insert(extension.into().to_ascii_lowercase(), mime_type.into());
        self
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }

    /// Resolve a filename to a MIME string, preferring caller overrides.
    pub fn resolve_mime(&self, filename: &str) -> String {
        if let Some(ext) = mime::extension_of(filename) {
            if let Some(mime_type) = self.mime_overrides.get(&ext) {
                return mime_type.clone();
            }
        }
        mime::resolve(filename).to_string()
    }

    /// Reject blank endpoint or credentials before any encoding or I/O.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.api_key.trim().is_empty() {
            return Err(UploadError::InvalidInput("API key must not be empty".into()));
        }
        if self.url.trim().is_empty() {
            return Err(UploadError::InvalidInput(
                "upload URL must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Clamp a requested timeout to the `[MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS]`
/// widget bounds.
pub fn clamp_timeout_secs(secs: u64) -> u64 {
    secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS)
}
