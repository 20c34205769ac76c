use serde::{Deserialize, Serialize};

use super::types::SummaryClient;
use super::SummaryError;

/// Ollama HTTP client for a locally hosted model.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, SummaryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SummaryError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl SummaryClient for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| SummaryError::from_transport(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummaryError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| SummaryError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn backend(&self) -> &'static str {
        "ollama"
    }
}

/// Mock summary client for testing. Returns a configurable response.
pub struct MockSummaryClient {
    response: String,
}

impl MockSummaryClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl SummaryClient for MockSummaryClient {
    fn generate(&self, _prompt: &str) -> Result<String, SummaryError> {
        Ok(self.response.clone())
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::summary::test_support::{closed_port_url, spawn_stub};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockSummaryClient::new("**Age:** 52 years");
        assert_eq!(client.generate("anything").unwrap(), "**Age:** 52 years");
        assert_eq!(client.backend(), "mock");
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3.1", 60).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn generate_posts_non_streaming_request() {
        let router = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                let echoed = format!(
                    "{}|{}|{}",
                    body["model"].as_str().unwrap_or_default(),
                    body["stream"],
                    body["prompt"].as_str().unwrap_or_default()
                );
                Json(json!({ "model": "llama3.1", "response": echoed, "done": true }))
            }),
        );
        let base = spawn_stub(router);

        let client = OllamaClient::new(&base, "llama3.1", 10).unwrap();
        assert_eq!(client.generate("Summarize").unwrap(), "llama3.1|false|Summarize");
    }

    #[test]
    fn malformed_body_is_a_parsing_error() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "unexpected": true })) }),
        );
        let base = spawn_stub(router);

        let client = OllamaClient::new(&base, "llama3.1", 10).unwrap();
        let err = client.generate("Summarize").unwrap_err();
        assert!(matches!(err, SummaryError::ResponseParsing(_)));
    }

    #[test]
    fn unreachable_ollama_reports_base_url() {
        let base = closed_port_url();
        let client = OllamaClient::new(&base, "llama3.1", 5).unwrap();
        match client.generate("Summarize").unwrap_err() {
            SummaryError::Connection(url) => assert_eq!(url, base),
            other => panic!("unexpected error: {other}"),
        }
    }
}
