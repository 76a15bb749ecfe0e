//! Remote image upload node.
//!
//! Encodes the host's in-memory image buffer as PNG and POSTs it to the
//! configured endpoint with a fixed 30-second timeout. Unlike the video
//! node, this node never propagates a failure past its own boundary: every
//! failure category is logged and returned as a `Failed` result, and the
//! host sees a completed (if fruitless) execution step.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};

use framedrop_client::{InputSource, UploadClient, UploadPayload, UploadTarget};
use framedrop_core::mime::IMAGE_PNG;
use framedrop_core::target::IMAGE_TIMEOUT_SECS;

use crate::node::{InputKind, InputSpec, Node, NodeContext, NodeInfo, NodeResult};

pub const DEFAULT_IMAGE_UPLOAD_URL: &str = "http://localhost:65360/upload";

/// Image upload node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUploadConfig {
    /// API key sent in the request header
    #[serde(default)]
    pub api_key: String,
    /// Upload endpoint
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    DEFAULT_IMAGE_UPLOAD_URL.to_string()
}

/// Image upload node implementation
#[derive(Debug, Default)]
pub struct ImageUploadNode;

impl ImageUploadNode {
    pub fn new() -> Self {
        Self
    }

    /// The fallible upload path. `execute` wraps this so every error comes
    /// back as a logged `Failed` result instead of propagating.
    async fn try_upload(&self, context: NodeContext) -> Result<NodeResult, String> {
        let config: ImageUploadConfig = serde_json::from_value(context.config.clone())
            .map_err(|e| format!("Failed to parse image upload configuration: {}", e))?;

        let target = UploadTarget::new(config.server_url, config.api_key)
            .with_fixed_timeout(Duration::from_secs(IMAGE_TIMEOUT_SECS));
        // Pre-flight: blank credentials or endpoint abort before any
        // encoding or network activity.
        target.validate().map_err(|e| e.to_string())?;

        let tensor = match context.input {
            InputSource::Image(tensor) => tensor,
            other => return Err(format!("Unsupported IMAGE input: {}", other.describe())),
        };

        let png = tensor.to_png().map_err(|e| e.to_string())?;
        let size_bytes = png.len();
        let payload = UploadPayload::new(png, framedrop_client::IMAGE_FILENAME, IMAGE_PNG);

        let client = UploadClient::new(target).map_err(|e| e.to_string())?;
        let started = Instant::now();
        let receipt = client.send(payload).await.map_err(|e| e.to_string())?;
        let elapsed_secs = started.elapsed().as_secs_f64();

        tracing::info!(
            message = receipt.message.as_deref().unwrap_or(""),
            stored_as = receipt.filename.as_deref().unwrap_or(""),
            size_bytes = size_bytes,
            elapsed_secs = elapsed_secs,
            "Image upload OK"
        );

        Ok(NodeResult::success(json!({
            "message": receipt.message,
            "remote_filename": receipt.filename,
            "size_bytes": size_bytes,
            "elapsed_secs": elapsed_secs,
            "uploaded_at": Utc::now().to_rfc3339(),
        })))
    }
}

#[async_trait]
impl Node for ImageUploadNode {
    fn name(&self) -> &str {
        "remote_image_upload"
    }

    fn info(&self) -> NodeInfo {
        NodeInfo {
            name: self.name().to_string(),
            display_name: "Remote Image Upload".to_string(),
            category: "image/remote".to_string(),
            inputs: vec![
                InputSpec::new("image", InputKind::Image),
                InputSpec::new(
                    "api_key",
                    InputKind::Text {
                        default: String::new(),
                    },
                ),
                InputSpec::new(
                    "server_url",
                    InputKind::Text {
                        default: DEFAULT_IMAGE_UPLOAD_URL.to_string(),
                    },
                ),
            ],
            always_dirty: true,
            output_node: true,
        }
    }

    fn validate_config(&self, config: &serde_json::Value) -> Result<()> {
        let _config: ImageUploadConfig = serde_json::from_value(config.clone())
            .context("Invalid image upload configuration: missing or invalid fields")?;
        Ok(())
    }

    async fn execute(&self, context: NodeContext) -> Result<NodeResult> {
        match self.try_upload(context).await {
            Ok(result) => Ok(result),
            Err(message) => {
                tracing::error!(error = %message, "Image upload failed");
                Ok(NodeResult::failed(message))
            }
        }
    }
}
