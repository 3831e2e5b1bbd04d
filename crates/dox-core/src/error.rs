use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input path not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("No documents found under {}", .0.display())]
    NoDocuments(PathBuf),

    #[error("Failed to read document {}: {reason}", .path.display())]
    DocumentRead { path: PathBuf, reason: String },

    #[error("Failed to write output {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid redaction rule '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn document_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DocumentRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_read_message_names_path() {
        let err = Error::document_read("/tmp/broken.docx", "invalid Zip archive");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/broken.docx"));
        assert!(msg.contains("invalid Zip archive"));
    }

    #[test]
    fn test_output_write_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::output_write("/root/out.jsonl", io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/root/out.jsonl"));
    }
}
