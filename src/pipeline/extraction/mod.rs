pub mod types;
pub mod format;
pub mod sanitize;
pub mod pdf;
pub mod page_image;
pub mod ocr;
pub mod orchestrator;

pub use types::*;
pub use format::*;
pub use sanitize::*;
pub use pdf::*;
pub use page_image::*;
pub use ocr::*;
pub use orchestrator::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tesseract OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("Image '{0}' needs OCR but no OCR engine is configured")]
    OcrUnavailable(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Scanned page image unusable: {0}")]
    ImageProcessing(String),

    #[error("Text encoding error in '{document}': {reason}")]
    Encoding { document: String, reason: String },

    #[error("Tessdata not found at: {0}")]
    TessdataNotFound(PathBuf),

    #[error("Unsupported format for '{0}' (expected PDF, image or plain text)")]
    UnsupportedFormat(String),
}
