use std::net::SocketAddr;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "IDR Justify";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed output artifact names and MIME types.
pub const DOCX_FILENAME: &str = "BCBS_Justification_for_IDR.docx";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PDF_FILENAME: &str = "BCBS_Justification_for_IDR.pdf";
pub const PDF_MIME: &str = "application/pdf";

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "idr_justify_lib=info,idr_justify=info"
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY must be set when the gemini summary backend is selected")]
    MissingApiKey,

    #[error("Unknown summary backend '{0}' (expected 'gemini' or 'ollama')")]
    UnknownBackend(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which hosted or local model answers the records summary call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryBackend {
    Gemini { base_url: String, api_key: String },
    Ollama { base_url: String },
}

/// Runtime configuration. Every secret comes from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: SummaryBackend,
    pub model: String,
    pub timeout_secs: u64,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (tests use a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend_name = get("IDR_SUMMARY_BACKEND").unwrap_or_else(|| "gemini".into());
        let (backend, default_model) = match backend_name.to_ascii_lowercase().as_str() {
            "gemini" => {
                let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::MissingApiKey)?;
                let base_url =
                    get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into());
                (SummaryBackend::Gemini { base_url, api_key }, DEFAULT_GEMINI_MODEL)
            }
            "ollama" => {
                let base_url =
                    get("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.into());
                (SummaryBackend::Ollama { base_url }, DEFAULT_OLLAMA_MODEL)
            }
            _ => return Err(ConfigError::UnknownBackend(backend_name)),
        };

        let model = get("IDR_SUMMARY_MODEL").unwrap_or_else(|| default_model.into());

        let timeout_secs = match get("IDR_SUMMARY_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "IDR_SUMMARY_TIMEOUT_SECS",
                value: raw,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_raw = get("IDR_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "IDR_BIND_ADDR",
                value: bind_raw,
            })?;

        Ok(Self {
            backend,
            model,
            timeout_secs,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn gemini_is_default_backend() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k-123")])).unwrap();
        assert_eq!(
            config.backend,
            SummaryBackend::Gemini {
                base_url: DEFAULT_GEMINI_BASE_URL.into(),
                api_key: "k-123".into(),
            }
        );
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_secs, 300);
        assert_eq!(config.bind_addr.port(), 8501);
    }

    #[test]
    fn gemini_without_key_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn ollama_backend_needs_no_key() {
        let config = AppConfig::from_lookup(lookup(&[
            ("IDR_SUMMARY_BACKEND", "Ollama"),
            ("OLLAMA_BASE_URL", "http://gpu-box:11434"),
            ("IDR_SUMMARY_MODEL", "medgemma:4b"),
        ]))
        .unwrap();
        assert_eq!(
            config.backend,
            SummaryBackend::Ollama {
                base_url: "http://gpu-box:11434".into()
            }
        );
        assert_eq!(config.model, "medgemma:4b");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("IDR_SUMMARY_BACKEND", "openai")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("openai".into()));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("IDR_SUMMARY_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "IDR_SUMMARY_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("IDR_BIND_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "IDR_BIND_ADDR", .. }));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn docx_artifact_constants() {
        assert!(DOCX_FILENAME.ends_with(".docx"));
        assert!(DOCX_MIME.starts_with("application/vnd.openxmlformats"));
    }
}
