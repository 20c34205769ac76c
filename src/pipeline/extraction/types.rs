use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Result of text extraction from a single uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub label: String,
    pub method: ExtractionMethod,
    pub pages: Vec<PageExtraction>,
    pub full_text: String,
    pub page_count: usize,
}

impl ExtractionResult {
    /// True when no page produced any usable text (e.g. a scanned PDF with no text layer).
    pub fn is_empty(&self) -> bool {
        self.full_text.trim().is_empty()
    }
}

/// How text was extracted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExtractionMethod {
    PdfDirect,
    TesseractOcr,
    PlainTextRead,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::PdfDirect => "pdf_direct",
            ExtractionMethod::TesseractOcr => "tesseract_ocr",
            ExtractionMethod::PlainTextRead => "plain_text",
        }
    }
}

/// Per-page extraction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageExtraction {
    pub page_number: usize,
    pub text: String,
    pub confidence: f32,
}

/// Raw OCR result from the engine
#[derive(Debug)]
pub struct OcrPageResult {
    pub text: String,
    pub confidence: f32,
}

/// OCR engine abstraction (allows mocking for tests)
pub trait OcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError>;
}

/// PDF text extraction abstraction
pub trait PdfExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;
}

/// Produces an OCR-ready image for one page of a scanned PDF.
pub trait PdfPageRenderer {
    /// `page_index` is zero-based.
    fn render_page(&self, pdf_bytes: &[u8], page_index: usize) -> Result<Vec<u8>, ExtractionError>;
}

/// Turns uploaded bytes into plain text.
pub trait TextExtractor {
    fn extract(&self, label: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractionError>;
}
