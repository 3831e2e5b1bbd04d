//! Paragraph record model

use serde::{Deserialize, Serialize};

/// One line of the output corpus.
///
/// Field order is the on-disk key order: `text`, `source`, `para_idx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    /// Paragraph text after redaction
    pub text: String,
    /// File name (not full path) of the originating document
    pub source: String,
    /// Zero-based position among the document's non-empty paragraphs
    pub para_idx: usize,
}

impl ParagraphRecord {
    pub fn new(text: impl Into<String>, source: impl Into<String>, para_idx: usize) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            para_idx,
        }
    }
}
