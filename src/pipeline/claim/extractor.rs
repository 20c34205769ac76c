use chrono::NaiveDate;

use super::patterns::{
    FieldPattern, ALPHANUMERIC_CODE, DATE_PATTERNS, DRG_PATTERNS, MODIFIER_25, PROCEDURE_CODE,
    PROVIDER_NOISE, PROVIDER_PATTERNS,
};
use super::types::ClaimRecord;

/// Emergency-department E/M and critical care base codes.
const EMERGENCY_RANGES: [(u32, u32); 2] = [(99281, 99285), (99291, 99292)];

const MODIFIER_SUFFIX: &str = "-25";

/// Parse raw EOB text into a [`ClaimRecord`].
///
/// Never fails: each field is attempted independently and a field with no
/// matching label is left empty (reads back as its sentinel).
pub fn extract_claim_record(text: &str) -> ClaimRecord {
    let date_of_service = extract_date_of_service(text);
    let procedure_codes = rank_procedure_codes(text);
    let classification_code = extract_classification_code(text);
    let billing_provider = extract_billing_provider(text);

    tracing::info!(
        text_length = text.len(),
        date_found = date_of_service.is_some(),
        procedure_codes = procedure_codes.len(),
        drg_found = classification_code.is_some(),
        provider_found = billing_provider.is_some(),
        "Claim fields extracted"
    );

    ClaimRecord::new(
        date_of_service,
        procedure_codes,
        classification_code,
        billing_provider,
    )
}

/// First capture of the first pattern (in list order) that matches anywhere.
fn first_match<'t>(
    field: &'static str,
    patterns: &[FieldPattern],
    text: &'t str,
) -> Option<&'t str> {
    patterns.iter().enumerate().find_map(|(index, p)| {
        let capture = p.regex.captures(text)?.get(1)?;
        tracing::debug!(field, pattern = p.label, index, "Field pattern matched");
        Some(capture.as_str().trim())
    })
}

/// Date of service as `MM/DD/YYYY`.
pub fn extract_date_of_service(text: &str) -> Option<String> {
    first_match("date_of_service", &DATE_PATTERNS, text).map(normalize_date)
}

/// Zero-pad month and day and widen a two-digit year to 20YY.
/// A capture that is not a real calendar date is returned unchanged.
fn normalize_date(raw: &str) -> String {
    let mut parts = raw.split('/').map(str::parse::<u32>);
    let (Some(Ok(month)), Some(Ok(day)), Some(Ok(year))) =
        (parts.next(), parts.next(), parts.next())
    else {
        return raw.to_string();
    };

    let year = match year {
        0..=99 => 2000 + year,
        1000..=9999 => year,
        _ => return raw.to_string(),
    };

    match NaiveDate::from_ymd_opt(year as i32, month, day) {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// Procedure codes in order of first appearance.
///
/// Lines are scanned one at a time. A line holding a plan-style identifier
/// (`AB1234`) contributes nothing. Emergency codes pick up `-25` when the
/// same line carries a standalone `25`. Duplicates are dropped by full code
/// string, so `99284` and `99284-25` can both appear.
pub fn rank_procedure_codes(text: &str) -> Vec<String> {
    let mut ranked: Vec<String> = Vec::new();
    let mut rejected_lines = 0usize;

    for line in text.lines() {
        if !PROCEDURE_CODE.is_match(line) {
            continue;
        }
        if ALPHANUMERIC_CODE.is_match(line) {
            rejected_lines += 1;
            continue;
        }

        let has_modifier = MODIFIER_25.is_match(line);

        for m in PROCEDURE_CODE.find_iter(line) {
            if is_amount_or_date(line, m.start(), m.end()) {
                continue;
            }
            let mut code = m.as_str().to_string();
            if has_modifier && is_emergency_code(&code) {
                code.push_str(MODIFIER_SUFFIX);
            }
            if !ranked.contains(&code) {
                ranked.push(code);
            }
        }
    }

    tracing::debug!(
        codes = ranked.len(),
        rejected_lines,
        "Procedure codes ranked"
    );
    ranked
}

/// Digits that belong to `$7,500.00`, `05/01/9999` and the like.
fn is_amount_or_date(line: &str, start: usize, end: usize) -> bool {
    let before = line[..start].chars().next_back();
    if matches!(before, Some('$' | '/' | '.' | ',')) {
        return true;
    }
    let mut after = line[end..].chars();
    matches!(
        (after.next(), after.next()),
        (Some('.' | '/' | ','), Some(d)) if d.is_ascii_digit()
    )
}

/// DRG code.
pub fn extract_classification_code(text: &str) -> Option<String> {
    first_match("classification_code", &DRG_PATTERNS, text).map(str::to_string)
}

/// Billing provider name with trailing administrative labels cut off.
pub fn extract_billing_provider(text: &str) -> Option<String> {
    let raw = first_match("billing_provider", &PROVIDER_PATTERNS, text)?;
    let cleaned = strip_provider_noise(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn strip_provider_noise(raw: &str) -> String {
    let cut = match PROVIDER_NOISE.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };
    cut.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '/' | ':' | ';'))
        .trim_start()
        .to_string()
}

/// Strip a `-NN` modifier suffix: `99284-25` -> `99284`.
pub fn base_code(code: &str) -> &str {
    code.split_once('-').map_or(code, |(base, _)| base)
}

/// Whether the base code falls in 99281-99285 or 99291-99292.
pub fn is_emergency_code(code: &str) -> bool {
    base_code(code)
        .parse::<u32>()
        .map(|n| EMERGENCY_RANGES.iter().any(|(lo, hi)| (*lo..=*hi).contains(&n)))
        .unwrap_or(false)
}
