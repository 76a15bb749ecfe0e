//! MIME resolution from file extensions.
//!
//! Small fixed table covering the container formats the upload server
//! accepts. The image path always uses [`IMAGE_PNG`] directly and never
//! goes through the table.

/// Content type for the image upload path.
pub const IMAGE_PNG: &str = "image/png";

/// Fallback when the extension is unknown or missing.
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Lower-cased extension after the last `.`, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Resolve a filename to a MIME string. Never fails; unknown or missing
/// extensions resolve to [`DEFAULT_VIDEO_MIME`].
pub fn resolve(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        _ => DEFAULT_VIDEO_MIME,
    }
}
