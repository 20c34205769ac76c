use std::time::Instant;

use super::gemini::GeminiClient;
use super::ollama::OllamaClient;
use super::prompt::build_summary_prompt;
use super::types::SummaryClient;
use super::SummaryError;
use crate::config::{AppConfig, SummaryBackend};

/// Turns medical-records text into the acuity narrative used by the letter.
///
/// Single attempt per call. Failures propagate to the caller unchanged.
pub struct RecordsSummarizer {
    client: Box<dyn SummaryClient + Send + Sync>,
}

impl RecordsSummarizer {
    pub fn new(client: Box<dyn SummaryClient + Send + Sync>) -> Self {
        Self { client }
    }

    pub fn summarize(&self, instructions: &str, records_text: &str) -> Result<String, SummaryError> {
        if records_text.trim().is_empty() {
            return Err(SummaryError::EmptyInput);
        }

        let prompt = build_summary_prompt(instructions, records_text);
        let start = Instant::now();
        tracing::info!(
            backend = self.client.backend(),
            prompt_length = prompt.len(),
            "Requesting records summary"
        );

        let raw = self.client.generate(&prompt)?;
        let summary = raw.trim();
        if summary.is_empty() {
            tracing::warn!(backend = self.client.backend(), "Summary service returned empty text");
            return Err(SummaryError::EmptyResponse);
        }

        tracing::info!(
            backend = self.client.backend(),
            summary_length = summary.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Records summary received"
        );
        Ok(summary.to_string())
    }
}

/// Build the configured summary backend.
pub fn build_summary_client(
    config: &AppConfig,
) -> Result<Box<dyn SummaryClient + Send + Sync>, SummaryError> {
    match &config.backend {
        SummaryBackend::Gemini { base_url, api_key } => Ok(Box::new(GeminiClient::new(
            base_url,
            api_key,
            &config.model,
            config.timeout_secs,
        )?)),
        SummaryBackend::Ollama { base_url } => Ok(Box::new(OllamaClient::new(
            base_url,
            &config.model,
            config.timeout_secs,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::summary::ollama::MockSummaryClient;
    use std::sync::{Arc, Mutex};

    /// Records the prompt it was given.
    struct CapturingClient {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl SummaryClient for CapturingClient {
        fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok("summary".into())
        }

        fn backend(&self) -> &'static str {
            "capture"
        }
    }

    struct FailingClient;

    impl SummaryClient for FailingClient {
        fn generate(&self, _prompt: &str) -> Result<String, SummaryError> {
            Err(SummaryError::ServiceError {
                status: 503,
                body: "overloaded".into(),
            })
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn summary_is_trimmed() {
        let summarizer = RecordsSummarizer::new(Box::new(MockSummaryClient::new(
            "\n  **Age:** 32 years\n**Acuity level:** ESI 2  \n",
        )));
        let summary = summarizer.summarize("Summarize", "Triage 14:02").unwrap();
        assert_eq!(summary, "**Age:** 32 years\n**Acuity level:** ESI 2");
    }

    #[test]
    fn prompt_contains_instructions_and_records() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let summarizer = RecordsSummarizer::new(Box::new(CapturingClient { seen: seen.clone() }));
        summarizer.summarize("Focus on acuity", "BP 180/110").unwrap();

        let prompts = seen.lock().unwrap();
        assert_eq!(prompts.len(), 1, "exactly one attempt");
        assert!(prompts[0].starts_with("Focus on acuity\n\n---\n\nBP 180/110"));
    }

    #[test]
    fn empty_records_are_rejected_before_calling_the_model() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let summarizer = RecordsSummarizer::new(Box::new(CapturingClient { seen: seen.clone() }));
        let err = summarizer.summarize("Summarize", "  \n ").unwrap_err();
        assert!(matches!(err, SummaryError::EmptyInput));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn blank_model_output_is_an_error() {
        let summarizer = RecordsSummarizer::new(Box::new(MockSummaryClient::new("   \n")));
        let err = summarizer.summarize("Summarize", "records").unwrap_err();
        assert!(matches!(err, SummaryError::EmptyResponse));
    }

    #[test]
    fn client_errors_propagate_verbatim() {
        let summarizer = RecordsSummarizer::new(Box::new(FailingClient));
        let err = summarizer.summarize("Summarize", "records").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Summary service returned error (status 503): overloaded"
        );
    }

    #[test]
    fn builds_configured_backend() {
        let config = AppConfig::from_lookup(|key| match key {
            "IDR_SUMMARY_BACKEND" => Some("ollama".into()),
            _ => None,
        })
        .unwrap();
        let client = build_summary_client(&config).unwrap();
        assert_eq!(client.backend(), "ollama");

        let config = AppConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("k".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(build_summary_client(&config).unwrap().backend(), "gemini");
    }
}
