use std::sync::LazyLock;

use regex::Regex;

/// A compiled field pattern. `label` is logged when the pattern wins.
pub(crate) struct FieldPattern {
    pub regex: Regex,
    pub label: &'static str,
}

fn pattern(re: &str, label: &'static str) -> FieldPattern {
    FieldPattern {
        regex: Regex::new(re).unwrap(),
        label,
    }
}

/// Date-of-service labels, highest priority first. Group 1 is the date.
pub(crate) static DATE_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\bDate\s+of\s+Service(?:\(s\)|s)?\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4})\b",
            "date_of_service",
        ),
        pattern(
            r"(?i)\bService\s+Date(?:\(s\)|s)?\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4})\b",
            "service_dates",
        ),
        pattern(
            r"(?i)\bService\s+Dates\s*[-\x{2013}]?\s*(\d{1,2}/\d{1,2}/\d{2,4})\b",
            "service_dates_dash",
        ),
        pattern(
            r"(?i)\bDate\s+Range\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4})\b",
            "date_range",
        ),
    ]
});

/// DRG labels. Specific labels come before the generic "number near DRG"
/// fallback, which would otherwise shadow them.
pub(crate) static DRG_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\bDRG[:#-]?\s*(\d{2,4})\b", "drg"),
        pattern(r"(?i)\bDRG\s+Code\s*[:#-]?\s*(\d{2,4})\b", "drg_code"),
        pattern(
            r"(?i)\bDiagnosis\s+Related\s+Group[^\d\n]{0,30}(\d{2,4})\b",
            "diagnosis_related_group",
        ),
        pattern(r"(?i)\bMS-DRG[^\d\n]{0,30}(\d{2,4})\b", "ms_drg"),
        pattern(r"(?i)\bDRG[^\d\n]{0,30}(\d{2,4})\b", "drg_generic"),
        pattern(r"(?i)RelatedGroup[^\d\n]{0,30}(\d{2,4})\b", "related_group"),
    ]
});

/// Billing-provider labels. Group 1 runs to the end of the line's name-like text.
pub(crate) static PROVIDER_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\bBilling\s+Provider(?:\s+Name)?[ \t]*:[ \t]*([A-Za-z0-9 &.,'\-/]+)",
            "billing_provider_colon",
        ),
        pattern(
            r"(?i)\bBilling\s+Provider[ \t]+([A-Za-z0-9 &.,'\-/]+)",
            "billing_provider",
        ),
        pattern(
            r"(?i)\bProvider\s+Name[ \t]*[:\-]?[ \t]*([A-Za-z0-9 &.,'\-/]+)",
            "provider_name",
        ),
    ]
});

/// Administrative labels that trail a provider name on the same line.
pub(crate) static PROVIDER_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:NPI|Other\s+Carrier|Rendering\s+Provider|Check\s+Date|Address|City|State|Zip)\b.*$",
    )
    .unwrap()
});

/// Procedure-code candidates: 4-5 digits starting with 7, 8 or 9.
pub(crate) static PROCEDURE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[789]\d{3,4}\b").unwrap());

/// Plan and modifier identifiers such as `AB1234`; a line carrying one is skipped.
pub(crate) static ALPHANUMERIC_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z]{2,}\d{4,}\b").unwrap());

/// A standalone `25` modifier token.
pub(crate) static MODIFIER_25: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s\-:])25(?:$|[\s,;])").unwrap());
