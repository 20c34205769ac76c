pub mod blocks;
pub mod document;
pub mod docx;
pub mod pdf;

pub use blocks::*;
pub use document::*;
pub use docx::*;
pub use pdf::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Word document packing failed: {0}")]
    Docx(String),

    #[error("PDF font error: {0}")]
    PdfFont(String),

    #[error("PDF save error: {0}")]
    PdfSave(String),
}
