//! HTTP server lifecycle: bind, serve the router, stop on Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::router::app_router;
use crate::pipeline::processor::JustificationProcessor;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bind `addr` and serve until the process receives Ctrl-C.
pub async fn serve(
    addr: SocketAddr,
    processor: Arc<JustificationProcessor>,
) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr()?;

    tracing::info!(addr = %local, "Justification server listening on http://{local}/");

    axum::serve(listener, app_router(processor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Justification server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_failure_names_the_address() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let processor = crate::pipeline::processor::JustificationProcessor::new(
            Box::new(crate::pipeline::extraction::orchestrator::DocumentExtractor::new(
                Box::new(crate::pipeline::extraction::pdf::PdfTextExtractor),
            )),
            crate::pipeline::summary::RecordsSummarizer::new(Box::new(
                crate::pipeline::summary::MockSummaryClient::new("summary"),
            )),
        );

        let err = serve(addr, Arc::new(processor)).await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
