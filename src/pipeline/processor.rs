//! Justification pipeline orchestrator.
//!
//! Single entry point that drives one run end to end:
//! extract EOB + records text → claim fields → records summary → letter →
//! blocks → display text + Word document.
//!
//! Uses trait-based DI for the text extractor and the summary client so the
//! orchestrator stays testable with mock implementations.

use std::time::Instant;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::pipeline::claim::{extract_claim_record, ClaimRecord, ClaimSummary};
use crate::pipeline::extraction::orchestrator::{decode_utf8, DocumentExtractor};
use crate::pipeline::extraction::types::{OcrEngine, TextExtractor};
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::letter::compose_letter;
use crate::pipeline::render::{
    parse_letter, write_docx, write_pdf, JustificationDocument, LetterDocument, RenderError,
};
use crate::pipeline::summary::{build_summary_client, RecordsSummarizer, SummaryError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a run. Missing claim fields never do; they degrade to
/// sentinels inside the record instead.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Missing upload: {0}")]
    MissingUpload(&'static str),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Summary failed: {0}")]
    Summary(#[from] SummaryError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// The three uploads of one run. `None` or empty bytes count as missing.
#[derive(Debug, Clone, Default)]
pub struct JustificationInput {
    pub eob: Option<Vec<u8>>,
    pub records: Option<Vec<u8>>,
    pub instructions: Option<Vec<u8>>,
}

impl JustificationInput {
    pub fn new(eob: Vec<u8>, records: Vec<u8>, instructions: Vec<u8>) -> Self {
        Self {
            eob: Some(eob),
            records: Some(records),
            instructions: Some(instructions),
        }
    }
}

fn require<'a>(upload: &'a Option<Vec<u8>>, name: &'static str) -> Result<&'a [u8], ProcessingError> {
    match upload.as_deref() {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ProcessingError::MissingUpload(name)),
    }
}

/// Everything one run produces. Request-scoped; nothing is retained.
#[derive(Debug, Clone)]
pub struct JustificationOutput {
    pub run_id: Uuid,
    pub record: ClaimRecord,
    pub summary: String,
    pub letter_text: String,
    pub letter: LetterDocument,
    pub display_text: String,
    pub docx: Vec<u8>,
}

impl JustificationOutput {
    pub fn document(&self) -> JustificationDocument<'_> {
        JustificationDocument::new(&self.record, &self.letter)
    }

    /// Render the PDF variant on demand.
    pub fn pdf(&self) -> Result<Vec<u8>, RenderError> {
        write_pdf(&self.document())
    }

    pub fn claim_summary(&self) -> ClaimSummary {
        self.record.summary()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives one justification run. Immutable after construction, so a single
/// instance can be shared across requests.
pub struct JustificationProcessor {
    extractor: Box<dyn TextExtractor + Send + Sync>,
    summarizer: RecordsSummarizer,
}

impl JustificationProcessor {
    pub fn new(extractor: Box<dyn TextExtractor + Send + Sync>, summarizer: RecordsSummarizer) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    /// Run the full pipeline.
    ///
    /// 1. Check all three uploads are present
    /// 2. Extract EOB and records text, decode the instructions
    /// 3. Parse claim fields from the EOB text
    /// 4. Summarize the records (single attempt)
    /// 5. Compose the letter, parse it into blocks
    /// 6. Produce display text and the Word document
    pub fn run(&self, input: &JustificationInput) -> Result<JustificationOutput, ProcessingError> {
        let eob_bytes = require(&input.eob, "eob")?;
        let records_bytes = require(&input.records, "records")?;
        let instruction_bytes = require(&input.instructions, "instructions")?;

        let run_id = Uuid::new_v4();
        let _run = tracing::info_span!("justification_run", run_id = %run_id).entered();
        let start = Instant::now();

        let eob = {
            let _stage = tracing::info_span!("stage", name = "extract_eob").entered();
            self.extractor.extract("eob", eob_bytes)?
        };
        let records = {
            let _stage = tracing::info_span!("stage", name = "extract_records").entered();
            self.extractor.extract("records", records_bytes)?
        };
        let instructions = decode_utf8("instructions", instruction_bytes)?;

        let record = {
            let _stage = tracing::info_span!("stage", name = "claim_fields").entered();
            extract_claim_record(&eob.full_text)
        };

        let summary = {
            let _stage = tracing::info_span!("stage", name = "summarize").entered();
            self.summarizer.summarize(&instructions, &records.full_text)?
        };

        let (letter_text, letter, display_text, docx) = {
            let _stage = tracing::info_span!("stage", name = "render").entered();
            let letter_text = compose_letter(&record, &summary);
            let letter = parse_letter(&letter_text);
            let display_text = letter.to_display_text();
            let docx = write_docx(&JustificationDocument::new(&record, &letter))?;
            (letter_text, letter, display_text, docx)
        };

        tracing::info!(
            eob_text_length = eob.full_text.len(),
            records_text_length = records.full_text.len(),
            procedure_codes = record.procedure_codes().len(),
            summary_length = summary.len(),
            blocks = letter.blocks().len(),
            docx_size = docx.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Justification run complete"
        );

        Ok(JustificationOutput {
            run_id,
            record,
            summary,
            letter_text,
            letter,
            display_text,
            docx,
        })
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build a `JustificationProcessor` with production implementations.
///
/// - PDF: `PdfTextExtractor`
/// - OCR: `BundledTesseract` when compiled with `ocr` and tessdata is found,
///   fed scan images by `LopdfImageExtractor` for PDF pages with no text layer
/// - Summary: the backend selected in `AppConfig`
///
/// Must be called outside an async runtime: the HTTP clients are blocking.
pub fn build_processor(config: &AppConfig) -> Result<JustificationProcessor, ProcessingError> {
    let pdf = Box::new(crate::pipeline::extraction::pdf::PdfTextExtractor);
    let mut extractor = DocumentExtractor::new(pdf);
    if let Some(ocr) = build_ocr_engine() {
        extractor = extractor.with_ocr_engine(ocr);
    }

    let client = build_summary_client(config)?;
    tracing::info!(
        backend = client.backend(),
        model = %config.model,
        "Justification processor using summary model"
    );

    Ok(JustificationProcessor::new(
        Box::new(extractor),
        RecordsSummarizer::new(client),
    ))
}

/// Build the OCR engine, respecting feature flags.
fn build_ocr_engine() -> Option<Box<dyn OcrEngine + Send + Sync>> {
    #[cfg(feature = "ocr")]
    {
        match crate::pipeline::extraction::ocr::BundledTesseract::from_system() {
            Ok(engine) => return Some(Box::new(engine)),
            Err(e) => tracing::warn!(error = %e, "Tesseract unavailable; image uploads will be rejected and scanned PDF pages stay empty"),
        }
    }

    #[cfg(not(feature = "ocr"))]
    tracing::info!("Built without OCR; image uploads will be rejected and scanned PDF pages stay empty");

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
