//! Document reader trait

use std::path::Path;

use dox_core::Result;

/// Opens a document and yields its paragraphs
pub trait DocumentReader {
    /// Raw paragraph texts in document order, blank ones included.
    ///
    /// Fails with `Error::DocumentRead` when the file cannot be opened or
    /// parsed.
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<String>>;
}

impl<R: DocumentReader + ?Sized> DocumentReader for &R {
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        (**self).read_paragraphs(path)
    }
}
