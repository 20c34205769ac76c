//! Upload/run/download routes.
//!
//! Returns a composable `Router`; `server::serve` binds it. The processor is
//! immutable and shared through `Arc`, so every request gets its own claim
//! record and document.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::page::UPLOAD_PAGE_HTML;
use crate::config::{DOCX_FILENAME, DOCX_MIME, PDF_FILENAME, PDF_MIME};
use crate::pipeline::claim::ClaimSummary;
use crate::pipeline::processor::{
    JustificationInput, JustificationOutput, JustificationProcessor, ProcessingError,
};

/// Multipart overhead on top of two 25 MB documents.
const BODY_LIMIT: usize = 55 * 1024 * 1024;

/// JSON body returned by `POST /api/justification`.
#[derive(Debug, Serialize)]
pub struct JustificationResponse {
    pub claim: ClaimSummary,
    pub display_text: String,
    pub docx_base64: String,
    pub filename: &'static str,
    pub mime_type: &'static str,
}

impl From<&JustificationOutput> for JustificationResponse {
    fn from(output: &JustificationOutput) -> Self {
        Self {
            claim: output.claim_summary(),
            display_text: output.display_text.clone(),
            docx_base64: STANDARD.encode(&output.docx),
            filename: DOCX_FILENAME,
            mime_type: DOCX_MIME,
        }
    }
}

/// Build the application router.
pub fn app_router(processor: Arc<JustificationProcessor>) -> Router {
    Router::new()
        .route("/", get(serve_upload_page))
        .route("/api/justification", post(run_justification))
        .route("/api/justification/docx", post(download_docx))
        .route("/api/justification/pdf", post(download_pdf))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(processor)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn serve_upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

async fn run_justification(
    State(processor): State<Arc<JustificationProcessor>>,
    multipart: Multipart,
) -> Result<Json<JustificationResponse>, ApiError> {
    let input = read_uploads(multipart).await?;
    let output = run_blocking(processor, input, |p, i| p.run(i)).await?;
    Ok(Json(JustificationResponse::from(&output)))
}

async fn download_docx(
    State(processor): State<Arc<JustificationProcessor>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let input = read_uploads(multipart).await?;
    let output = run_blocking(processor, input, |p, i| p.run(i)).await?;
    Ok(attachment(DOCX_MIME, DOCX_FILENAME, output.docx))
}

async fn download_pdf(
    State(processor): State<Arc<JustificationProcessor>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let input = read_uploads(multipart).await?;
    let pdf = run_blocking(processor, input, |p, i| {
        let output = p.run(i)?;
        Ok(output.pdf()?)
    })
    .await?;
    Ok(attachment(PDF_MIME, PDF_FILENAME, pdf))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Collect the three named file fields. Unknown fields are ignored; absence
/// is reported by the processor so the check order stays in one place.
async fn read_uploads(mut multipart: Multipart) -> Result<JustificationInput, ApiError> {
    let mut input = JustificationInput::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        let slot = match name.as_str() {
            "eob" => &mut input.eob,
            "records" => &mut input.records,
            "instructions" => &mut input.instructions,
            _ => continue,
        };
        let bytes = field.bytes().await?;
        tracing::debug!(field = %name, size = bytes.len(), "Upload received");
        *slot = Some(bytes.to_vec());
    }

    Ok(input)
}

/// Run a pipeline call on the blocking pool; the summary clients block.
async fn run_blocking<T, F>(
    processor: Arc<JustificationProcessor>,
    input: JustificationInput,
    job: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&JustificationProcessor, &JustificationInput) -> Result<T, ProcessingError>
        + Send
        + 'static,
{
    tokio::task::spawn_blocking(move || job(&processor, &input))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn attachment(mime: &'static str, filename: &'static str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
