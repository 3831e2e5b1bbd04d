//! Paragraph extraction

use std::path::Path;

use dox_core::Result;

use crate::reader::DocumentReader;

/// Trim each paragraph and drop the ones left empty.
///
/// Dropped paragraphs take no position, so the index of an item in the
/// returned vector is its `para_idx`.
pub fn trim_and_filter<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|p| {
            let trimmed = p.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

/// Non-empty, trimmed paragraphs of the document at `path`
pub fn extract<R: DocumentReader>(reader: &R, path: &Path) -> Result<Vec<String>> {
    let raw = reader.read_paragraphs(path)?;
    let total = raw.len();
    let paragraphs = trim_and_filter(raw);

    tracing::debug!(
        path = %path.display(),
        total,
        kept = paragraphs.len(),
        "extracted paragraphs"
    );

    Ok(paragraphs)
}
