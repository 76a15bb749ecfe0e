//! Node system core infrastructure
//!
//! This module provides the abstraction layer between upload
//! implementations and the node-graph host, keeping node implementations
//! separate from the host's registration mechanics.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Debug;

use framedrop_client::InputSource;

/// Context provided to nodes during execution.
///
/// # Security Note
///
/// The `config` field carries the caller's API key. Nodes MUST NOT log the
/// config value or any sensitive fields within it.
pub struct NodeContext {
    /// The node's primary input, resolved to a tagged shape at the boundary.
    pub input: InputSource,
    /// Node-specific configuration (the host's widget values).
    ///
    /// WARNING: contains credentials. Never log this field directly.
    pub config: serde_json::Value,
}

/// Node execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Node execution completed successfully
    Success,
    /// Node execution failed
    Failed,
}

/// Result returned by node execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResult {
    /// Node execution status
    pub status: NodeStatus,
    /// Output data (e.g. upload receipt fields)
    pub data: serde_json::Value,
    /// Optional error message if execution failed
    pub error: Option<String>,
}

impl NodeResult {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: NodeStatus::Success,
            data,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: NodeStatus::Failed,
            data: json!({}),
            error: Some(message.into()),
        }
    }
}

/// Trait that all nodes must implement
#[async_trait]
pub trait Node: Send + Sync + Debug {
    /// Get the node name/identifier
    fn name(&self) -> &str;

    /// Declare the node's host-facing surface: display name, category,
    /// inputs, and execution flags.
    fn info(&self) -> NodeInfo;

    /// Execute the node with the given context
    async fn execute(&self, context: NodeContext) -> Result<NodeResult>;

    /// Validate node configuration
    fn validate_config(&self, config: &serde_json::Value) -> Result<()>;
}

/// Node information for listing and host registration
#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    /// Node name/identifier
    pub name: String,
    /// Human-readable display name
    pub display_name: String,
    /// Menu category (e.g. "utils/network")
    pub category: String,
    /// Declared inputs with defaults and bounds
    pub inputs: Vec<InputSpec>,
    /// The host must bypass its result cache and re-run this node on every
    /// execution-graph run.
    pub always_dirty: bool,
    /// Terminal node: produces no forwarded value.
    pub output_node: bool,
}

/// One host-visible input field.
#[derive(Debug, Clone, Serialize)]
pub struct InputSpec {
    pub name: String,
    pub kind: InputKind,
}

impl InputSpec {
    pub fn new(name: impl Into<String>, kind: InputKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Input widget type, with defaults and bounds where the host needs them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    /// In-memory image buffer supplied by the host.
    Image,
    /// Video resource reference supplied by the host.
    Video,
    /// Free-text field.
    Text { default: String },
    /// Bounded integer field.
    Integer { default: i64, min: i64, max: i64 },
}
