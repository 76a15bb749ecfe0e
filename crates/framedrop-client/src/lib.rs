//! Upload client for the framedrop nodes.
//!
//! Normalizes the heterogeneous inputs a host hands its nodes (raw bytes,
//! file paths, file-like handles, structured references, in-memory image
//! tensors) into a single payload shape, then performs one multipart POST
//! against the configured endpoint. One attempt per call; the caller owns
//! retry policy (and there is none).

pub mod client;
pub mod source;
pub mod tensor;

pub use client::{UploadClient, API_KEY_HEADER};
pub use source::{normalize, FileLike, InputSource, Named, DEFAULT_VIDEO_FILENAME};
pub use tensor::{ImageTensor, IMAGE_FILENAME};

// Re-export the core types callers need alongside the client.
pub use framedrop_core::{UploadError, UploadPayload, UploadReceipt, UploadTarget};
