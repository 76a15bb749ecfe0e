//! Host-facing upload nodes.
//!
//! This crate provides the abstraction layer between the upload client and
//! a node-graph host: an object-safe [`Node`] trait, typed input
//! declarations with the host collaboration flags (always re-run, terminal
//! output node), a registry, and the two concrete upload nodes.

pub mod image_upload;
pub mod node;
pub mod registry;
pub mod video_upload;

pub use image_upload::{ImageUploadConfig, ImageUploadNode, DEFAULT_IMAGE_UPLOAD_URL};
pub use node::{InputKind, InputSpec, Node, NodeContext, NodeInfo, NodeResult, NodeStatus};
pub use registry::{default_registry, NodeRegistry};
pub use video_upload::{VideoUploadConfig, VideoUploadNode, DEFAULT_VIDEO_UPLOAD_URL};
