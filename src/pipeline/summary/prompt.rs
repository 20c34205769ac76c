/// Layout the model is asked to follow. The letter renderer relies on the
/// `**Label:**` headings it produces.
pub const SUMMARY_FORMAT_INSTRUCTION: &str = "Format output with clear Markdown rich text formatting: \
use **bold** for section headings, line breaks for clarity, \
and structure it like this:\n\n\
**Age:** 32 years\n\
**Date(s) of Service or Visit Timeline:**\nArrival Time: ...\nTriage Time: ...\n\n\
**Presenting Symptoms:**\n...\n\n\
**Notable clinical findings or diagnosis:**\n...\n\n\
**Clinical complexity level:** ...\n\
**Acuity level:** ...\n\
**Any relevant follow-up plans or referrals:** ...";

/// Build the single prompt sent to the summary model: operator instructions,
/// a separator, the records text, then the fixed formatting instruction.
pub fn build_summary_prompt(instructions: &str, records_text: &str) -> String {
    format!(
        "{}\n\n---\n\n{}\n\n{}",
        instructions.trim(),
        records_text,
        SUMMARY_FORMAT_INSTRUCTION
    )
}
