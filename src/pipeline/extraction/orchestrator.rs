use super::format::{detect_category, FileCategory};
use super::page_image::LopdfImageExtractor;
use super::sanitize::sanitize_extracted_text;
use super::types::{
    ExtractionMethod, ExtractionResult, OcrEngine, PageExtraction, PdfExtractor, PdfPageRenderer,
    TextExtractor,
};
use super::ExtractionError;

/// A PDF page with less text than this is treated as a scan.
const MIN_TEXT_LAYER_CHARS: usize = 20;

/// Concrete implementation of the text extractor.
/// Uses trait objects for OCR and PDF extraction, enabling dependency injection.
pub struct DocumentExtractor {
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
    ocr_engine: Option<Box<dyn OcrEngine + Send + Sync>>,
    pdf_renderer: Box<dyn PdfPageRenderer + Send + Sync>,
}

impl DocumentExtractor {
    pub fn new(pdf_extractor: Box<dyn PdfExtractor + Send + Sync>) -> Self {
        Self {
            pdf_extractor,
            ocr_engine: None,
            pdf_renderer: Box::new(LopdfImageExtractor),
        }
    }

    /// Replace the page renderer used to OCR PDF pages without a text layer.
    pub fn with_pdf_renderer(mut self, renderer: Box<dyn PdfPageRenderer + Send + Sync>) -> Self {
        self.pdf_renderer = renderer;
        self
    }

    /// Add an OCR engine for photographed or scanned image uploads.
    pub fn with_ocr_engine(mut self, engine: Box<dyn OcrEngine + Send + Sync>) -> Self {
        self.ocr_engine = Some(engine);
        self
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, label: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
        let category = detect_category(bytes);
        tracing::info!(
            document = label,
            category = category.as_str(),
            size = bytes.len(),
            "Starting text extraction"
        );

        let (method, mut pages) = match category {
            FileCategory::Pdf => {
                let pages = self.pdf_extractor.extract_text(bytes)?;
                match &self.ocr_engine {
                    Some(engine) if pages.iter().any(is_scanned_page) => {
                        let (pages, ocr_pages) =
                            ocr_scanned_pages(label, bytes, pages, &*self.pdf_renderer, &**engine)?;
                        let method = if ocr_pages > 0 {
                            ExtractionMethod::TesseractOcr
                        } else {
                            ExtractionMethod::PdfDirect
                        };
                        (method, pages)
                    }
                    _ => (ExtractionMethod::PdfDirect, pages),
                }
            }
            FileCategory::Image => {
                let engine = self
                    .ocr_engine
                    .as_ref()
                    .ok_or_else(|| ExtractionError::OcrUnavailable(label.to_string()))?;
                let ocr_result = engine.ocr_image(bytes)?;
                let page = PageExtraction {
                    page_number: 1,
                    text: ocr_result.text,
                    confidence: ocr_result.confidence,
                };
                (ExtractionMethod::TesseractOcr, vec![page])
            }
            FileCategory::PlainText => {
                let text = decode_utf8(label, bytes)?;
                let page = PageExtraction {
                    page_number: 1,
                    text,
                    confidence: 0.99,
                };
                (ExtractionMethod::PlainTextRead, vec![page])
            }
            FileCategory::Unsupported => {
                return Err(ExtractionError::UnsupportedFormat(label.to_string()));
            }
        };

        for page in &mut pages {
            page.text = sanitize_extracted_text(&page.text);
        }

        let full_text = pages
            .iter()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let result = ExtractionResult {
            label: label.to_string(),
            method,
            page_count: pages.len(),
            pages,
            full_text,
        };

        if result.is_empty() {
            tracing::warn!(
                document = label,
                method = method.as_str(),
                "No text extracted; the document may be a scan without a text layer"
            );
        } else {
            tracing::info!(
                document = label,
                method = method.as_str(),
                pages = result.page_count,
                text_length = result.full_text.len(),
                "Text extraction complete"
            );
        }

        Ok(result)
    }
}

fn is_scanned_page(page: &PageExtraction) -> bool {
    page.text.trim().chars().count() < MIN_TEXT_LAYER_CHARS
}

/// OCR every page whose text layer is missing or too short.
/// A page whose image cannot be pulled out keeps its direct text; OCR engine
/// failures abort. Returns the pages and how many were OCR'd.
fn ocr_scanned_pages(
    label: &str,
    pdf_bytes: &[u8],
    pages: Vec<PageExtraction>,
    renderer: &dyn PdfPageRenderer,
    engine: &dyn OcrEngine,
) -> Result<(Vec<PageExtraction>, usize), ExtractionError> {
    let mut ocr_pages = 0;
    let mut out = Vec::with_capacity(pages.len());

    for (index, page) in pages.into_iter().enumerate() {
        if !is_scanned_page(&page) {
            out.push(page);
            continue;
        }

        let image = match renderer.render_page(pdf_bytes, index) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(
                    document = label,
                    page = page.page_number,
                    error = %e,
                    "No scan image on page; keeping text layer"
                );
                out.push(page);
                continue;
            }
        };

        let ocr = engine.ocr_image(&image)?;
        tracing::debug!(
            document = label,
            page = page.page_number,
            confidence = ocr.confidence,
            text_length = ocr.text.len(),
            "Scanned page OCR'd"
        );
        ocr_pages += 1;
        out.push(PageExtraction {
            page_number: page.page_number,
            text: ocr.text,
            confidence: ocr.confidence,
        });
    }

    Ok((out, ocr_pages))
}

/// Decode an uploaded text file (summary instructions, plain-text exports).
/// A UTF-8 byte-order mark is dropped.
pub fn decode_utf8(label: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Encoding {
        document: label.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::pipeline::extraction::ocr::MockOcrEngine;
    use crate::pipeline::extraction::page_image::tests::{make_scanned_pdf, FAKE_JPEG};
    use crate::pipeline::extraction::pdf::tests::make_test_pdf;
    use crate::pipeline::extraction::types::OcrPageResult;
    use crate::pipeline::extraction::pdf::PdfTextExtractor;

    struct FixedPdfExtractor(Vec<&'static str>);

    impl PdfExtractor for FixedPdfExtractor {
        fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, t)| PageExtraction {
                    page_number: i + 1,
                    text: t.to_string(),
                    confidence: 0.95,
                })
                .collect())
        }
    }

    fn extractor_with_pages(pages: Vec<&'static str>) -> DocumentExtractor {
        DocumentExtractor::new(Box::new(FixedPdfExtractor(pages)))
    }

    #[test]
    fn pdf_pages_are_joined_and_sanitized() {
        let extractor = extractor_with_pages(vec!["  Service Dates 05/01/2024 \x0c", "", "DRG 470"]);
        let result = extractor.extract("eob", b"%PDF-1.7 fake").unwrap();
        assert_eq!(result.method, ExtractionMethod::PdfDirect);
        assert_eq!(result.page_count, 3);
        assert_eq!(result.full_text, "Service Dates 05/01/2024\nDRG 470");
    }

    #[test]
    fn real_pdf_goes_through_pdf_extract() {
        let extractor = DocumentExtractor::new(Box::new(PdfTextExtractor));
        let bytes = make_test_pdf(&[&["Billing Provider: Acme ER"]]);
        let result = extractor.extract("eob", &bytes).unwrap();
        assert!(result.full_text.contains("Acme"));
    }

    #[test]
    fn scanned_pdf_without_text_layer_is_degraded_not_failed() {
        let extractor = extractor_with_pages(vec!["", "   "]);
        let result = extractor.extract("records", b"%PDF-1.4 scanned").unwrap();
        assert!(result.is_empty());
    }

    /// Returns a fixed image per page and records which pages were asked for.
    struct StubRenderer(Arc<Mutex<Vec<usize>>>);

    impl PdfPageRenderer for StubRenderer {
        fn render_page(&self, _pdf: &[u8], page_index: usize) -> Result<Vec<u8>, ExtractionError> {
            self.0.lock().unwrap().push(page_index);
            Ok(FAKE_JPEG.to_vec())
        }
    }

    /// Records the image bytes it was handed.
    struct RecordingOcr(Arc<Mutex<Vec<Vec<u8>>>>);

    impl OcrEngine for RecordingOcr {
        fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
            self.0.lock().unwrap().push(image_bytes.to_vec());
            Ok(OcrPageResult {
                text: "Temp 38.9°C, triage ESI 2".into(),
                confidence: 0.72,
            })
        }
    }

    #[test]
    fn pages_without_text_layer_are_ocrd() {
        let asked = Arc::new(Mutex::new(Vec::new()));
        let long_page = "Patient arrived by ambulance with chest pain";
        let extractor = extractor_with_pages(vec!["", long_page])
            .with_pdf_renderer(Box::new(StubRenderer(Arc::clone(&asked))))
            .with_ocr_engine(Box::new(MockOcrEngine::new("Triage ESI 2", 0.7)));

        let result = extractor.extract("records", b"%PDF-1.4 scanned").unwrap();
        assert_eq!(result.method, ExtractionMethod::TesseractOcr);
        assert_eq!(result.full_text, format!("Triage ESI 2\n{long_page}"));
        assert!((result.pages[0].confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(*asked.lock().unwrap(), vec![0]);
    }

    #[test]
    fn scanned_pdf_image_reaches_the_ocr_engine() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let extractor = DocumentExtractor::new(Box::new(PdfTextExtractor))
            .with_ocr_engine(Box::new(RecordingOcr(Arc::clone(&seen))));

        let pdf = make_scanned_pdf(&[FAKE_JPEG]);
        let result = extractor.extract("records", &pdf).unwrap();

        assert_eq!(result.method, ExtractionMethod::TesseractOcr);
        assert_eq!(result.full_text, "Temp 38.9°C, triage ESI 2");
        assert_eq!(*seen.lock().unwrap(), vec![FAKE_JPEG.to_vec()]);
    }

    #[test]
    fn page_without_scan_image_keeps_its_text() {
        let extractor = extractor_with_pages(vec!["DRG 470"])
            .with_ocr_engine(Box::new(MockOcrEngine::new("should not appear", 0.5)));
        // Not a parseable PDF, so the default renderer finds no image.
        let result = extractor.extract("eob", b"%PDF-1.4 short page").unwrap();
        assert_eq!(result.method, ExtractionMethod::PdfDirect);
        assert_eq!(result.full_text, "DRG 470");
    }

    #[test]
    fn digital_pages_never_reach_the_renderer() {
        let asked = Arc::new(Mutex::new(Vec::new()));
        let extractor = extractor_with_pages(vec!["Explanation of Benefits for claim 12345"])
            .with_pdf_renderer(Box::new(StubRenderer(Arc::clone(&asked))))
            .with_ocr_engine(Box::new(MockOcrEngine::new("unused", 0.5)));
        let result = extractor.extract("eob", b"%PDF-1.7 digital").unwrap();
        assert_eq!(result.method, ExtractionMethod::PdfDirect);
        assert!(asked.lock().unwrap().is_empty());
    }

    #[test]
    fn plain_text_is_read_directly() {
        let extractor = extractor_with_pages(vec![]);
        let result = extractor
            .extract("eob", b"Date of Service: 05/01/2024\r\n99284 25\r\n")
            .unwrap();
        assert_eq!(result.method, ExtractionMethod::PlainTextRead);
        assert_eq!(result.full_text, "Date of Service: 05/01/2024\n99284 25");
    }

    #[test]
    fn image_without_ocr_engine_is_an_error() {
        let extractor = extractor_with_pages(vec![]);
        let err = extractor
            .extract("records", &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A])
            .unwrap_err();
        assert!(matches!(err, ExtractionError::OcrUnavailable(ref l) if l == "records"));
    }

    #[test]
    fn image_with_ocr_engine_uses_ocr() {
        let extractor = extractor_with_pages(vec![])
            .with_ocr_engine(Box::new(MockOcrEngine::new("Triage at 14:02\nESI level 2", 0.7)));
        let result = extractor
            .extract("records", &[0xFF, 0xD8, 0xFF, 0xE0, 0x00])
            .unwrap();
        assert_eq!(result.method, ExtractionMethod::TesseractOcr);
        assert_eq!(result.full_text, "Triage at 14:02\nESI level 2");
    }

    #[test]
    fn unsupported_bytes_are_rejected() {
        let extractor = extractor_with_pages(vec![]);
        let err = extractor.extract("eob", &[0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }

    #[test]
    fn decode_utf8_strips_bom() {
        let text = decode_utf8("instructions", b"\xEF\xBB\xBFSummarize").unwrap();
        assert_eq!(text, "Summarize");
    }

    #[test]
    fn decode_utf8_rejects_invalid_bytes() {
        let err = decode_utf8("instructions", &[0xC3, 0x28]).unwrap_err();
        assert!(matches!(err, ExtractionError::Encoding { .. }));
    }
}
