//! HTTP shell around the justification pipeline.
//!
//! Serves the upload page, runs the pipeline on uploaded files and returns
//! the letter plus the Word or PDF document. Errors map to structured JSON
//! through `ApiError`.

pub mod error;
pub mod page;
pub mod router;
pub mod server;

pub use router::app_router;
pub use server::{serve, ServerError};
