use std::borrow::Cow;

use super::template::{SectionDescriptor, Slot, LETTER_SECTIONS};
use crate::pipeline::claim::{base_code, is_emergency_code, ClaimRecord};

/// Emergency E/M code referenced when the claim carries none.
pub const FALLBACK_EMERGENCY_CODE: &str = "99285";

/// Shown in place of an empty procedure-code list.
pub const NO_CODES_PLACEHOLDER: &str = "N/A";

/// Composes the letter text from a claim record and the records narrative.
pub struct LetterBuilder<'a> {
    record: &'a ClaimRecord,
    narrative: &'a str,
    sections: &'a [SectionDescriptor],
}

impl<'a> LetterBuilder<'a> {
    pub fn new(record: &'a ClaimRecord, narrative: &'a str) -> Self {
        Self {
            record,
            narrative,
            sections: LETTER_SECTIONS,
        }
    }

    /// Replace the standard section list.
    pub fn with_sections(mut self, sections: &'a [SectionDescriptor]) -> Self {
        self.sections = sections;
        self
    }

    fn slot_value(&self, slot: Slot) -> Cow<'a, str> {
        match slot {
            Slot::DateOfService => Cow::Borrowed(self.record.date_of_service()),
            Slot::ProcedureCodes => Cow::Owned(format_procedure_codes(self.record)),
            Slot::ClassificationCode => Cow::Borrowed(self.record.classification_code()),
            Slot::EmergencyCode => Cow::Borrowed(emergency_code(self.record)),
            Slot::BillingProvider => Cow::Borrowed(self.record.billing_provider()),
            Slot::Narrative => Cow::Borrowed(self.narrative.trim()),
        }
    }

    /// Substitute the section's declared slots in one left-to-right pass.
    /// Substituted text is never rescanned, so braces inside the narrative
    /// come through untouched. Undeclared names are left as written.
    fn fill(&self, section: &SectionDescriptor) -> String {
        let body = section.body;
        let mut out = String::with_capacity(body.len() + self.narrative.len());
        let mut rest = body;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let slot = after.find('}').and_then(|close| {
                Slot::from_name(&after[..close])
                    .filter(|s| section.slots.contains(s))
                    .map(|s| (s, close))
            });
            match slot {
                Some((slot, close)) => {
                    out.push_str(&self.slot_value(slot));
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// `## heading`, blank line, body, blank line.
    pub fn render_section(&self, section: &SectionDescriptor) -> String {
        format!("## {}\n\n{}\n\n", section.heading, self.fill(section))
    }

    pub fn build(&self) -> String {
        let letter: String = self
            .sections
            .iter()
            .map(|section| self.render_section(section))
            .collect();

        tracing::debug!(
            sections = self.sections.len(),
            letter_length = letter.len(),
            "Letter composed"
        );

        format!("{}\n", letter.trim_end())
    }
}

/// Build the full letter with the standard sections.
pub fn compose_letter(record: &ClaimRecord, narrative: &str) -> String {
    LetterBuilder::new(record, narrative).build()
}

/// First emergency-range code on the claim with its modifier stripped,
/// or [`FALLBACK_EMERGENCY_CODE`].
pub fn emergency_code(record: &ClaimRecord) -> &str {
    record
        .procedure_codes()
        .iter()
        .map(|c| c.as_str())
        .find(|c| is_emergency_code(c))
        .map(base_code)
        .unwrap_or(FALLBACK_EMERGENCY_CODE)
}

/// Comma-joined codes in document order, or [`NO_CODES_PLACEHOLDER`].
pub fn format_procedure_codes(record: &ClaimRecord) -> String {
    let codes = record.procedure_codes();
    if codes.is_empty() {
        NO_CODES_PLACEHOLDER.to_string()
    } else {
        codes.join(", ")
    }
}
