//! Text extraction from uploaded feedback documents.
//!
//! Turns a [`RawDocument`] (PDF or plain-text bytes plus a kind tag) into a
//! trimmed UTF-8 string ready for analysis.

pub mod error;
pub mod extractor;
pub mod types;

pub use error::ExtractError;
pub use extractor::extract;
pub use types::{DocumentKind, RawDocument};
