pub mod types;
pub mod prompt;
pub mod gemini;
pub mod ollama;
pub mod summarizer;

pub use types::*;
pub use prompt::*;
pub use gemini::*;
pub use ollama::*;
pub use summarizer::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Summary service is not reachable at {0}")]
    Connection(String),

    #[error("Summary service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Summary service returned no usable text: {0}")]
    MalformedResponse(String),

    #[error("Medical records text is empty; nothing to summarize")]
    EmptyInput,

    #[error("Summary service returned an empty summary")]
    EmptyResponse,

    #[error("No API key configured for the hosted summary model")]
    MissingApiKey,
}

impl SummaryError {
    /// Map a transport-level reqwest failure the same way for every backend.
    pub(crate) fn from_transport(err: reqwest::Error, base_url: &str, timeout_secs: u64) -> Self {
        if err.is_connect() {
            SummaryError::Connection(base_url.to_string())
        } else if err.is_timeout() {
            SummaryError::HttpClient(format!("Request timed out after {timeout_secs}s"))
        } else {
            SummaryError::HttpClient(err.to_string())
        }
    }
}

/// Tiny HTTP stubs for exercising the blocking clients.
#[cfg(test)]
pub(crate) mod test_support {
    /// Serve `router` on an ephemeral port from a background runtime.
    /// Returns the base URL.
    pub(crate) fn spawn_stub(router: axum::Router) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, router).await.unwrap();
            });
        });

        format!("http://{addr}")
    }

    /// A base URL nothing listens on.
    pub(crate) fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}
