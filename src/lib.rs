pub mod api; // Upload/run/download HTTP shell
pub mod config;
pub mod pipeline; // Extraction, claim fields, summary, letter, rendering

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Startup failures. Anything after startup is reported per request.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cannot build the justification pipeline: {0}")]
    Pipeline(#[from] pipeline::processor::ProcessingError),

    #[error("Cannot start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Server(#[from] api::ServerError),
}

pub fn run() -> Result<(), RunError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::AppConfig::from_env()?;

    // Blocking HTTP clients must be built outside the runtime.
    let processor = Arc::new(pipeline::processor::build_processor(&config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(RunError::Runtime)?;

    runtime.block_on(api::serve(config.bind_addr, processor))?;
    Ok(())
}
