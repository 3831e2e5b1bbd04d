//! Document Set resolution

use std::path::{Path, PathBuf};

use dox_core::{Error, Result};

use crate::denylist::Denylist;

/// Options for scanning a directory for documents
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extension without the dot, matched case-insensitively
    pub extension: String,
    pub denylist: Denylist,
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "docx".to_string(),
            denylist: Denylist::new(vec!["**/~$*".to_string()]),
            follow_links: false,
        }
    }
}

/// Resolve `input` to the list of documents to process.
///
/// A file is returned as-is. A directory is walked recursively and every file
/// with the configured extension is returned, sorted by path.
pub fn resolve_documents(input: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }

    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(input)
        .follow_links(options.follow_links)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(input, e.path(), &options.denylist))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = ?e.path(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if is_file(&entry) && has_extension(entry.path(), &options.extension) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(Error::NoDocuments(input.to_path_buf()));
    }

    // Sort for determinism
    files.sort();

    for file in &files {
        tracing::debug!(path = %file.display(), "resolved document");
    }

    Ok(files)
}

/// Regular files, and links that resolve to one when links aren't followed
fn is_file(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn is_excluded(root: &Path, path: &Path, denylist: &Denylist) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let path_str = relative.display().to_string();

    match denylist.matching_pattern(&path_str) {
        Some(pattern) => {
            tracing::debug!(path = %path.display(), %pattern, "excluded from scan");
            true
        }
        None => false,
    }
}
