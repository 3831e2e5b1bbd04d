//! Core domain models for dox
//!
//! This crate contains:
//! - The paragraph record written to the corpus
//! - The policy applied when a document cannot be read
//! - The shared error taxonomy

pub mod error;
pub mod policy;
pub mod record;

pub use error::{Error, Result};
pub use policy::ErrorPolicy;
pub use record::ParagraphRecord;
