//! JSONL corpus writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use dox_core::{Error, ParagraphRecord, Result};

/// Writes one JSON object per line and counts what it wrote.
///
/// Each record is serialized into a single buffer, newline included, before
/// it reaches the destination, so the output only ever grows by whole lines.
pub struct CorpusWriter<W: Write> {
    inner: W,
    count: usize,
    label: PathBuf,
}

impl CorpusWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`, making missing parent directories
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::output_write(path, e))?;
        }

        let file = File::create(path).map_err(|e| Error::output_write(path, e))?;

        Ok(Self {
            inner: BufWriter::new(file),
            count: 0,
            label: path.to_path_buf(),
        })
    }

    /// Close and delete the file, discarding everything written so far
    pub fn abandon(self) -> Result<()> {
        let path = self.label.clone();
        drop(self.inner);
        std::fs::remove_file(&path).map_err(|e| Error::output_write(path, e))
    }
}

impl<W: Write> CorpusWriter<W> {
    /// Wrap an arbitrary destination
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            count: 0,
            label: PathBuf::from("<stream>"),
        }
    }

    /// Append one record as a line
    pub fn write(&mut self, record: &ParagraphRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        self.inner
            .write_all(&line)
            .map_err(|e| Error::output_write(&self.label, e))?;
        self.count += 1;
        Ok(())
    }

    /// Records written so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flush and close, returning the total record count
    pub fn finalize(self) -> Result<usize> {
        self.finish().map(|(count, _)| count)
    }

    /// Flush and hand back the destination with the record count
    pub fn finish(mut self) -> Result<(usize, W)> {
        self.inner
            .flush()
            .map_err(|e| Error::output_write(&self.label, e))?;
        Ok((self.count, self.inner))
    }
}
