//! Field extraction from explanation-of-benefits text.
//!
//! Every field is matched against an ordered pattern list and degrades to a
//! sentinel on its own; nothing here returns an error.

pub mod types;
mod patterns;
pub mod extractor;

pub use types::*;
pub use extractor::*;
