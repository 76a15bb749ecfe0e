//! Input normalization: turn whatever shape the host hands a node into a
//! single `UploadPayload`.
//!
//! Each accepted shape is one variant of [`InputSource`], resolved once at
//! the boundary with one handler per variant. Anything else fails with
//! `UnsupportedInput` carrying enough of the observed value to diagnose.

use std::fmt;
use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use framedrop_core::mime::IMAGE_PNG;
use framedrop_core::{UploadError, UploadPayload, UploadTarget};

use crate::tensor::{ImageTensor, IMAGE_FILENAME};

/// Default filename when the input carries no name of its own.
pub const DEFAULT_VIDEO_FILENAME: &str = "video.mp4";

/// Structured-reference keys, probed in order: path-like keys first, then
/// inline-bytes keys (base64), then the filename key treated as a path.
const PATH_KEYS: &[&str] = &["path", "file_path"];
const DATA_KEYS: &[&str] = &["data", "bytes"];
const NAME_KEY: &str = "filename";

/// File-like input source. Mirrors what a host hands plugin nodes:
/// something readable, maybe named, maybe rewindable.
pub trait FileLike: Read + Send {
    /// Name associated with the source, if any.
    fn file_name(&self) -> Option<String> {
        None
    }

    /// Called after the normalizer drains the source so a caller-held
    /// handle is left at the start. Failures are ignored.
    fn rewind_to_start(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileLike for fs::File {
    fn rewind_to_start(&mut self) -> io::Result<()> {
        self.rewind()
    }
}

impl<T: AsRef<[u8]> + Send> FileLike for io::Cursor<T> {
    fn rewind_to_start(&mut self) -> io::Result<()> {
        self.set_position(0);
        Ok(())
    }
}

/// Attach a name to any file-like source.
pub struct Named<R> {
    inner: R,
    name: String,
}

impl<R: FileLike> Named<R> {
    pub fn new(inner: R, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }
}

impl<R: Read> Read for Named<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: FileLike> FileLike for Named<R> {
    fn file_name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn rewind_to_start(&mut self) -> io::Result<()> {
        self.inner.rewind_to_start()
    }
}

/// The shapes a node accepts for its primary input.
pub enum InputSource {
    /// Raw bytes, already encoded.
    Bytes(Vec<u8>),
    /// Local file path; must exist.
    Path(PathBuf),
    /// Anything readable (host resource handles).
    Handle(Box<dyn FileLike>),
    /// JSON object with one of several possible key names for the same
    /// logical field.
    Structured(Value),
    /// In-memory image buffer, `[0, 1]`-normalized per channel.
    Image(ImageTensor),
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Bytes(data) => f.debug_tuple("Bytes").field(&data.len()).finish(),
            InputSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            InputSource::Handle(_) => f.write_str("Handle(..)"),
            InputSource::Structured(value) => f.debug_tuple("Structured").field(value).finish(),
            InputSource::Image(tensor) => f.debug_tuple("Image").field(tensor).finish(),
        }
    }
}

impl InputSource {
    /// Short human-readable description of the shape, for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            InputSource::Bytes(data) => format!("{} inline bytes", data.len()),
            InputSource::Path(path) => format!("path {}", path.display()),
            InputSource::Handle(_) => "file handle".to_string(),
            InputSource::Structured(value) => format!("structured value {}", value),
            InputSource::Image(tensor) => format!(
                "{}x{}x{} image tensor",
                tensor.height(),
                tensor.width(),
                tensor.channels()
            ),
        }
    }
}

/// Convert an [`InputSource`] into an [`UploadPayload`], resolving the
/// content type against the target's MIME overrides. Pure with respect to
/// the input value: the same bytes in produce the same payload out.
pub fn normalize(source: InputSource, target: &UploadTarget) -> Result<UploadPayload, UploadError> {
    let (data, filename) = match source {
        InputSource::Bytes(data) => (data, DEFAULT_VIDEO_FILENAME.to_string()),
        InputSource::Path(path) => read_path(&path)?,
        InputSource::Handle(handle) => read_handle(handle)?,
        InputSource::Structured(value) => read_structured(&value)?,
        InputSource::Image(tensor) => {
            let png = tensor.to_png()?;
            return Ok(UploadPayload::new(png, IMAGE_FILENAME, IMAGE_PNG));
        }
    };
    let content_type = target.resolve_mime(&filename);
    Ok(UploadPayload::new(data, filename, content_type))
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn read_path(path: &Path) -> Result<(Vec<u8>, String), UploadError> {
    if !path.exists() {
        return Err(UploadError::FileNotFound(path.display().to_string()));
    }
    let data = fs::read(path)?;
    let filename = base_name(path).unwrap_or_else(|| DEFAULT_VIDEO_FILENAME.to_string());
    Ok((data, filename))
}

fn read_handle(mut handle: Box<dyn FileLike>) -> Result<(Vec<u8>, String), UploadError> {
    let mut data = Vec::new();
    handle.read_to_end(&mut data)?;
    let _ = handle.rewind_to_start();
    let filename = handle
        .file_name()
        .and_then(|name| base_name(Path::new(&name)))
        .unwrap_or_else(|| DEFAULT_VIDEO_FILENAME.to_string());
    Ok((data, filename))
}

/// Probe the candidate keys in order and apply the path or inline-bytes
/// rule to the first well-typed match. A wrongly typed value is skipped;
/// a well-typed path that does not exist is a hard failure.
fn read_structured(value: &Value) -> Result<(Vec<u8>, String), UploadError> {
    let object = value.as_object().ok_or_else(|| {
        UploadError::UnsupportedInput(format!("expected an object reference, got {}", value))
    })?;

    for key in PATH_KEYS {
        if let Some(path) = object.get(*key).and_then(Value::as_str) {
            return read_path(Path::new(path));
        }
    }

    for key in DATA_KEYS {
        if let Some(encoded) = object.get(*key).and_then(Value::as_str) {
            if let Ok(data) = general_purpose::STANDARD.decode(encoded) {
                let filename = object
                    .get(NAME_KEY)
                    .and_then(Value::as_str)
                    .and_then(|name| base_name(Path::new(name)))
                    .unwrap_or_else(|| DEFAULT_VIDEO_FILENAME.to_string());
                return Ok((data, filename));
            }
        }
    }

    if let Some(path) = object.get(NAME_KEY).and_then(Value::as_str) {
        return read_path(Path::new(path));
    }

    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    Err(UploadError::UnsupportedInput(format!(
        "no usable key among [{}]",
        keys.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn target() -> UploadTarget {
        UploadTarget::new("http://localhost:65360/upload_video", "key")
    }

    #[test]
    fn inline_bytes_pass_through_with_default_name() {
        let payload = normalize(InputSource::Bytes(vec![7; 42]), &target()).unwrap();
        assert_eq!(payload.len(), 42);
        assert_eq!(payload.filename, "video.mp4");
        assert_eq!(payload.content_type, "video/mp4");
    }

    #[test]
    fn normalizing_same_bytes_twice_is_identical() {
        let first = normalize(InputSource::Bytes(vec![1, 2, 3]), &target()).unwrap();
        let second = normalize(InputSource::Bytes(vec![1, 2, 3]), &target()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn path_input_reads_file_and_keeps_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mkv");
        fs::write(&path, b"matroska bytes").unwrap();

        let payload = normalize(InputSource::Path(path), &target()).unwrap();
        assert_eq!(payload.data, b"matroska bytes");
        assert_eq!(payload.filename, "clip.mkv");
        assert_eq!(payload.content_type, "video/x-matroska");
    }

    #[test]
    fn missing_path_fails_with_file_not_found() {
        let err = normalize(
            InputSource::Path(PathBuf::from("/definitely/not/here.mp4")),
            &target(),
        )
        .unwrap_err();
        match err {
            UploadError::FileNotFound(path) => assert!(path.contains("not/here.mp4")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn handle_is_drained_and_rewound() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"handle bytes").unwrap();
        file.rewind().unwrap();

        let payload = normalize(InputSource::Handle(Box::new(file)), &target()).unwrap();
        assert_eq!(payload.data, b"handle bytes");
        assert_eq!(payload.filename, "video.mp4");
    }

    #[test]
    fn named_handle_uses_base_name() {
        let cursor = io::Cursor::new(b"named bytes".to_vec());
        let named = Named::new(cursor, "/renders/out/final.webm");
        let payload = normalize(InputSource::Handle(Box::new(named)), &target()).unwrap();
        assert_eq!(payload.filename, "final.webm");
        assert_eq!(payload.content_type, "video/webm");
    }

    #[test]
    fn structured_path_key_wins_over_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.mov");
        fs::write(&path, b"mov bytes").unwrap();

        let value = json!({
            "path": path.to_string_lossy(),
            "data": general_purpose::STANDARD.encode(b"ignored"),
        });
        let payload = normalize(InputSource::Structured(value), &target()).unwrap();
        assert_eq!(payload.data, b"mov bytes");
        assert_eq!(payload.filename, "render.mov");
    }

    #[test]
    fn structured_data_key_decodes_base64() {
        let value = json!({
            "data": general_purpose::STANDARD.encode(b"raw clip"),
            "filename": "clip.avi",
        });
        let payload = normalize(InputSource::Structured(value), &target()).unwrap();
        assert_eq!(payload.data, b"raw clip");
        assert_eq!(payload.filename, "clip.avi");
        assert_eq!(payload.content_type, "video/x-msvideo");
    }

    #[test]
    fn structured_skips_wrongly_typed_candidates() {
        let value = json!({
            "path": 42,
            "data": general_purpose::STANDARD.encode(b"fallback"),
        });
        let payload = normalize(InputSource::Structured(value), &target()).unwrap();
        assert_eq!(payload.data, b"fallback");
    }

    #[test]
    fn structured_without_usable_keys_is_unsupported() {
        let err = normalize(InputSource::Structured(json!({"foo": 1})), &target()).unwrap_err();
        match err {
            UploadError::UnsupportedInput(msg) => assert!(msg.contains("foo")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn non_object_structured_value_is_unsupported() {
        let err = normalize(InputSource::Structured(json!("just a string")), &target()).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedInput(_)));
    }

    #[test]
    fn image_tensor_becomes_png_payload() {
        let tensor = ImageTensor::new(vec![0.5; 2 * 2 * 3], vec![2, 2, 3]).unwrap();
        let payload = normalize(InputSource::Image(tensor), &target()).unwrap();
        assert_eq!(payload.filename, "image.png");
        assert_eq!(payload.content_type, "image/png");
        assert!(image::load_from_memory(&payload.data).is_ok());
    }
}
