use serde::Serialize;

/// Placeholder shown when no date-of-service label matched.
pub const DATE_NOT_FOUND: &str = "Date not found";
/// Placeholder shown when no DRG label matched.
pub const DRG_NOT_FOUND: &str = "DRG Code not found";
/// Placeholder shown when no billing-provider label matched.
pub const PROVIDER_NOT_FOUND: &str = "Billing Provider not found";

/// Structured fields pulled from an explanation-of-benefits document.
///
/// Built once per run by the field extractor and read-only afterwards:
/// the fields are private and only exposed through getters. A field that
/// could not be found is `None` internally and reads back as its sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimRecord {
    date_of_service: Option<String>,
    procedure_codes: Vec<String>,
    classification_code: Option<String>,
    billing_provider: Option<String>,
}

impl ClaimRecord {
    pub fn new(
        date_of_service: Option<String>,
        procedure_codes: Vec<String>,
        classification_code: Option<String>,
        billing_provider: Option<String>,
    ) -> Self {
        Self {
            date_of_service,
            procedure_codes,
            classification_code,
            billing_provider,
        }
    }

    /// `MM/DD/YYYY`, or [`DATE_NOT_FOUND`].
    pub fn date_of_service(&self) -> &str {
        self.date_of_service.as_deref().unwrap_or(DATE_NOT_FOUND)
    }

    /// Procedure codes in first-appearance order, `-25` suffix included.
    pub fn procedure_codes(&self) -> &[String] {
        &self.procedure_codes
    }

    /// DRG code, or [`DRG_NOT_FOUND`].
    pub fn classification_code(&self) -> &str {
        self.classification_code.as_deref().unwrap_or(DRG_NOT_FOUND)
    }

    /// Billing provider name, or [`PROVIDER_NOT_FOUND`].
    pub fn billing_provider(&self) -> &str {
        self.billing_provider.as_deref().unwrap_or(PROVIDER_NOT_FOUND)
    }

    pub fn has_date_of_service(&self) -> bool {
        self.date_of_service.is_some()
    }

    pub fn has_classification_code(&self) -> bool {
        self.classification_code.is_some()
    }

    pub fn has_billing_provider(&self) -> bool {
        self.billing_provider.is_some()
    }

    /// Flattened, display-ready view for JSON responses.
    pub fn summary(&self) -> ClaimSummary {
        ClaimSummary {
            date_of_service: self.date_of_service().to_string(),
            procedure_codes: self.procedure_codes.clone(),
            drg_code: self.classification_code().to_string(),
            billing_provider: self.billing_provider().to_string(),
        }
    }
}

/// Serializable claim fields with sentinels already substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimSummary {
    pub date_of_service: String,
    pub procedure_codes: Vec<String>,
    pub drg_code: String,
    pub billing_provider: String,
}
