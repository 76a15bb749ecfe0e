//! Remote video upload node.
//!
//! Takes the host's video input in any of the accepted shapes, resolves a
//! container MIME type from the filename, and POSTs the bytes to the
//! configured endpoint. Every failure category propagates to the host as
//! one uniform error with a human-readable message; the host surfaces it
//! as a failed execution step.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

use framedrop_client::{normalize, InputSource, UploadClient, UploadTarget};
use framedrop_core::target::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};

use crate::node::{InputKind, InputSpec, Node, NodeContext, NodeInfo, NodeResult};

pub const DEFAULT_VIDEO_UPLOAD_URL: &str = "http://127.0.0.1:65360/upload_video";

/// Video upload node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUploadConfig {
    /// Upload endpoint
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    /// API key sent in the request header
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds, clamped to the widget bounds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_upload_url() -> String {
    DEFAULT_VIDEO_UPLOAD_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Video upload node implementation
#[derive(Debug, Default)]
pub struct VideoUploadNode;

impl VideoUploadNode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Node for VideoUploadNode {
    fn name(&self) -> &str {
        "remote_video_upload"
    }

    fn info(&self) -> NodeInfo {
        NodeInfo {
            name: self.name().to_string(),
            display_name: "Remote Video Upload".to_string(),
            category: "utils/network".to_string(),
            inputs: vec![
                InputSpec::new("video", InputKind::Video),
                InputSpec::new(
                    "upload_url",
                    InputKind::Text {
                        default: DEFAULT_VIDEO_UPLOAD_URL.to_string(),
                    },
                ),
                InputSpec::new(
                    "api_key",
                    InputKind::Text {
                        default: String::new(),
                    },
                ),
                InputSpec::new(
                    "timeout_seconds",
                    InputKind::Integer {
                        default: DEFAULT_TIMEOUT_SECS as i64,
                        min: MIN_TIMEOUT_SECS as i64,
                        max: MAX_TIMEOUT_SECS as i64,
                    },
                ),
            ],
            always_dirty: true,
            output_node: true,
        }
    }

    fn validate_config(&self, config: &serde_json::Value) -> Result<()> {
        let config: VideoUploadConfig = serde_json::from_value(config.clone())
            .context("Invalid video upload configuration: missing or invalid fields")?;

        if config.upload_url.trim().is_empty() {
            anyhow::bail!("Upload URL is required but not provided");
        }

        Ok(())
    }

    async fn execute(&self, context: NodeContext) -> Result<NodeResult> {
        let config: VideoUploadConfig = serde_json::from_value(context.config.clone())
            .context("Failed to parse video upload configuration")?;

        // The video node refuses image tensors; the image node owns that path.
        if matches!(context.input, InputSource::Image(_)) {
            anyhow::bail!("Unsupported VIDEO input: {}", context.input.describe());
        }

        let target = UploadTarget::new(config.upload_url, config.api_key)
            .with_timeout_secs(config.timeout_seconds);
        let client = UploadClient::new(target).map_err(|e| anyhow!("Video upload failed: {}", e))?;

        let payload = normalize(context.input, client.target())
            .map_err(|e| anyhow!("Failed to extract video bytes: {}", e))?;
        if payload.is_empty() {
            anyhow::bail!("Failed to extract video bytes from VIDEO input");
        }

        let filename = payload.filename.clone();
        let size_bytes = payload.len();

        let started = Instant::now();
        let receipt = client
            .send(payload)
            .await
            .map_err(|e| anyhow!("Video upload failed: {}", e))?;
        let elapsed_secs = started.elapsed().as_secs_f64();

        tracing::info!(
            filename = %filename,
            size_bytes = size_bytes,
            elapsed_secs = elapsed_secs,
            "Video upload OK"
        );

        Ok(NodeResult::success(json!({
            "filename": filename,
            "size_bytes": size_bytes,
            "elapsed_secs": elapsed_secs,
            "message": receipt.message,
            "remote_filename": receipt.filename,
            "uploaded_at": Utc::now().to_rfc3339(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeStatus;

    fn config_for(server_url: &str) -> serde_json::Value {
        json!({
            "upload_url": server_url,
            "api_key": "test-key",
            "timeout_seconds": 60,
        })
    }

    #[test]
    fn config_defaults_apply() {
        let config: VideoUploadConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.upload_url, DEFAULT_VIDEO_UPLOAD_URL);
        assert_eq!(config.api_key, "");
        assert_eq!(config.timeout_seconds, 300);
    }

    #[test]
    fn validate_config_rejects_blank_url() {
        let node = VideoUploadNode::new();
        assert!(node.validate_config(&json!({"upload_url": "  "})).is_err());
        assert!(node.validate_config(&json!({})).is_ok());
    }

    #[test]
    fn info_declares_host_flags_and_bounds() {
        let info = VideoUploadNode::new().info();
        assert!(info.always_dirty);
        assert!(info.output_node);
        assert_eq!(info.category, "utils/network");
        let timeout = info
            .inputs
            .iter()
            .find(|spec| spec.name == "timeout_seconds")
            .unwrap();
        assert!(matches!(
            timeout.kind,
            InputKind::Integer {
                default: 300,
                min: 30,
                max: 3600
            }
        ));
    }

    #[tokio::test]
    async fn uploads_bytes_and_reports_receipt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload_video")
            .match_header("X-API-KEY", "test-key")
            .with_status(200)
            .with_body(r#"{"message":"stored","filename":"abc.mp4"}"#)
            .create_async()
            .await;

        let node = VideoUploadNode::new();
        let result = node
            .execute(NodeContext {
                input: InputSource::Bytes(b"video bytes".to_vec()),
                config: config_for(&format!("{}/upload_video", server.url())),
            })
            .await
            .unwrap();

        assert_eq!(result.status, NodeStatus::Success);
        assert_eq!(result.data["filename"], "video.mp4");
        assert_eq!(result.data["size_bytes"], 11);
        assert_eq!(result.data["message"], "stored");
        assert_eq!(result.data["remote_filename"], "abc.mp4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn auth_failure_propagates_as_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload_video")
            .with_status(401)
            .create_async()
            .await;

        let node = VideoUploadNode::new();
        let err = node
            .execute(NodeContext {
                input: InputSource::Bytes(b"video bytes".to_vec()),
                config: config_for(&format!("{}/upload_video", server.url())),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Video upload failed"));
    }

    #[tokio::test]
    async fn image_tensor_input_is_rejected() {
        let tensor = framedrop_client::ImageTensor::new(vec![0.0; 3], vec![1, 1, 3]).unwrap();
        let node = VideoUploadNode::new();
        let err = node
            .execute(NodeContext {
                input: InputSource::Image(tensor),
                config: json!({}),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported VIDEO input"));
    }

    #[tokio::test]
    async fn empty_bytes_fail_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload_video")
            .expect(0)
            .create_async()
            .await;

        let node = VideoUploadNode::new();
        let err = node
            .execute(NodeContext {
                input: InputSource::Bytes(Vec::new()),
                config: config_for(&format!("{}/upload_video", server.url())),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to extract video bytes"));
        mock.assert_async().await;
    }
}
