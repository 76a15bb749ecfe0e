//! Node registry for managing available nodes

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::image_upload::ImageUploadNode;
use crate::node::{Node, NodeInfo};
use crate::video_upload::VideoUploadNode;

/// Registry for managing and retrieving nodes.
///
/// Thread-safe and async-compatible using tokio's RwLock. Registration
/// typically happens once at startup; reads dominate afterwards.
#[derive(Clone)]
pub struct NodeRegistry {
    nodes: Arc<RwLock<HashMap<String, Arc<dyn Node>>>>,
    node_info: Arc<RwLock<HashMap<String, NodeInfo>>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(RwLock::new(HashMap::new())),
            node_info: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a node under its own declared name.
    pub async fn register(&self, node: Arc<dyn Node>) -> Result<()> {
        let name = node.name().to_string();
        let info = node.info();

        let mut nodes = self.nodes.write().await;
        let mut node_info = self.node_info.write().await;

        nodes.insert(name.clone(), node);
        node_info.insert(name, info);

        Ok(())
    }

    /// Get a node by name
    pub async fn get(&self, name: &str) -> Result<Arc<dyn Node>> {
        let nodes = self.nodes.read().await;

        nodes
            .get(name)
            .cloned()
            .with_context(|| format!("Node '{}' not found", name))
    }

    /// List all registered nodes
    pub async fn list(&self) -> Vec<NodeInfo> {
        let node_info = self.node_info.read().await;

        let mut infos: Vec<NodeInfo> = node_info.values().cloned().collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Check if a node is registered
    pub async fn contains(&self, name: &str) -> bool {
        let nodes = self.nodes.read().await;

        nodes.contains_key(name)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with both upload nodes registered.
pub async fn default_registry() -> Result<NodeRegistry> {
    let registry = NodeRegistry::new();
    registry.register(Arc::new(ImageUploadNode::new())).await?;
    registry.register(Arc::new(VideoUploadNode::new())).await?;
    Ok(registry)
}
