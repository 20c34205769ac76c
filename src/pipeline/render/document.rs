use super::blocks::LetterDocument;
use crate::pipeline::claim::ClaimRecord;
use crate::pipeline::letter::format_procedure_codes;

pub const DOCUMENT_TITLE: &str = "BCBS Justification for IDR";
pub const CLAIM_INFORMATION_HEADING: &str = "Claim Information";

/// Everything a downloadable artifact shows: title, claim summary, letter.
pub struct JustificationDocument<'a> {
    record: &'a ClaimRecord,
    letter: &'a LetterDocument,
}

impl<'a> JustificationDocument<'a> {
    pub fn new(record: &'a ClaimRecord, letter: &'a LetterDocument) -> Self {
        Self { record, letter }
    }

    pub fn title(&self) -> &'static str {
        DOCUMENT_TITLE
    }

    pub fn letter(&self) -> &'a LetterDocument {
        self.letter
    }

    /// Plain paragraphs under the "Claim Information" heading.
    pub fn claim_lines(&self) -> Vec<String> {
        vec![
            format!("Date of Service: {}", self.record.date_of_service()),
            format!(
                "Procedure Codes (7/8/9 only, ranked as per EOB): {}",
                format_procedure_codes(self.record)
            ),
            format!("DRG Code: {}", self.record.classification_code()),
            format!("Billing Provider: {}", self.record.billing_provider()),
        ]
    }
}
