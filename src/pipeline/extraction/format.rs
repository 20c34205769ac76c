//! Upload format detection from magic bytes (never from the filename or
//! the browser-supplied Content-Type).

use serde::Serialize;

/// Category of an uploaded document, which decides the extraction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Pdf,
    Image,
    PlainText,
    Unsupported,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Pdf => "pdf",
            FileCategory::Image => "image",
            FileCategory::PlainText => "plain_text",
            FileCategory::Unsupported => "unsupported",
        }
    }
}

/// Classify uploaded bytes.
pub fn detect_category(bytes: &[u8]) -> FileCategory {
    if bytes.starts_with(b"%PDF") {
        return FileCategory::Pdf;
    }
    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return FileCategory::Image;
    }
    // PNG: 89 50 4E 47
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return FileCategory::Image;
    }
    // TIFF, little and big endian
    if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        return FileCategory::Image;
    }
    if looks_like_text(bytes) {
        return FileCategory::PlainText;
    }
    FileCategory::Unsupported
}

/// Valid UTF-8 without NUL bytes. An empty upload is not text.
fn looks_like_text(bytes: &[u8]) -> bool {
    !bytes.is_empty() && !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok()
}
