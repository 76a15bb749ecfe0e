//! Multipart upload executor.

use std::time::Instant;

use framedrop_core::{
    classify_failure_status, UploadError, UploadPayload, UploadReceipt, UploadTarget,
};

use crate::source::{normalize, InputSource};

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Performs exactly one multipart POST per call against a fixed target.
/// No retry on any outcome; a failed attempt is terminal for that
/// invocation.
#[derive(Clone, Debug)]
pub struct UploadClient {
    http: reqwest::Client,
    target: UploadTarget,
}

impl UploadClient {
    pub fn new(target: UploadTarget) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| UploadError::Connection(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { http, target })
    }

    /// Create a client from environment: FRAMEDROP_UPLOAD_URL and
    /// FRAMEDROP_API_KEY.
    pub fn from_env() -> Result<Self, UploadError> {
        let url = std::env::var("FRAMEDROP_UPLOAD_URL").map_err(|_| {
            UploadError::InvalidInput("Missing upload URL. Set FRAMEDROP_UPLOAD_URL".into())
        })?;
        let api_key = std::env::var("FRAMEDROP_API_KEY").map_err(|_| {
            UploadError::InvalidInput("Missing API key. Set FRAMEDROP_API_KEY".into())
        })?;
        Self::new(UploadTarget::new(url, api_key))
    }

    pub fn target(&self) -> &UploadTarget {
        &self.target
    }

    /// Normalize an input source and send it in one call.
    pub async fn upload(&self, source: InputSource) -> Result<UploadReceipt, UploadError> {
        let payload = normalize(source, &self.target)?;
        self.send(payload).await
    }

    /// Send a payload: one POST, one part named `file`, API key header,
    /// configured timeout. Classifies the outcome per the error taxonomy.
    pub async fn send(&self, payload: UploadPayload) -> Result<UploadReceipt, UploadError> {
        if payload.is_empty() {
            return Err(UploadError::InvalidInput(
                "payload is empty; nothing to upload".into(),
            ));
        }

        let filename = payload.filename.clone();
        let size_bytes = payload.len();
        let timeout_secs = self.target.timeout_secs();

        let part = reqwest::multipart::Part::bytes(payload.data)
            .file_name(filename.clone())
            .mime_str(&payload.content_type)
            .map_err(|e| {
                UploadError::InvalidInput(format!(
                    "invalid content type {}: {}",
                    payload.content_type, e
                ))
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::info!(
            url = %self.target.url,
            filename = %filename,
            size_bytes = size_bytes,
            "Uploading file"
        );

        let started = Instant::now();
        let response = self
            .http
            .post(&self.target.url)
            .header(API_KEY_HEADER, &self.target.api_key)
            .multipart(form)
            .timeout(self.target.timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, timeout_secs))?;
        let elapsed = started.elapsed();

        let status = response.status().as_u16();
        if status == 200 {
            let raw = response
                .text()
                .await
                .map_err(|e| UploadError::Connection(format!("failed to read response: {}", e)))?;
            let receipt: UploadReceipt = serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Success response body was not valid JSON");
                UploadReceipt::default()
            });
            tracing::info!(
                filename = %filename,
                size_bytes = size_bytes,
                elapsed_secs = elapsed.as_secs_f64(),
                "Upload completed"
            );
            Ok(receipt)
        } else {
            let raw = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(classify_failure_status(status, &raw))
        }
    }
}

/// Timeouts outrank every other transport failure; the rest collapse into
/// one connection-level category.
fn classify_transport_error(err: reqwest::Error, timeout_secs: u64) -> UploadError {
    if err.is_timeout() {
        UploadError::Timeout(timeout_secs)
    } else {
        UploadError::Connection(err.to_string())
    }
}
