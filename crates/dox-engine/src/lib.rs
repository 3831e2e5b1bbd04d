pub mod writer;

use std::io::Write;
use std::path::{Path, PathBuf};

use dox_core::{Error, ErrorPolicy, ParagraphRecord, Result};
use dox_security::{PiiMasker, RedactionCount, merge_counts};
use dox_sources::{DocumentReader, DocxReader, ScanOptions, extract, resolve_documents};

pub use writer::CorpusWriter;

/// Knobs for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub scan: ScanOptions,
    pub on_error: ErrorPolicy,
}

/// A document left out of the corpus because it could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Total records written
    pub records: usize,
    /// Documents that contributed (possibly zero) records
    pub documents: usize,
    pub skipped: Vec<SkippedDocument>,
    pub redactions: Vec<RedactionCount>,
}

/// Drives extract -> mask -> write over a Document Set
pub struct Pipeline<R: DocumentReader = DocxReader> {
    reader: R,
    masker: PiiMasker,
    options: PipelineOptions,
}

impl Pipeline<DocxReader> {
    pub fn new(options: PipelineOptions) -> Self {
        Self::with_reader(DocxReader, options)
    }
}

impl<R: DocumentReader> Pipeline<R> {
    pub fn with_reader(reader: R, options: PipelineOptions) -> Self {
        Self {
            reader,
            masker: PiiMasker::new(),
            options,
        }
    }

    pub fn with_masker(mut self, masker: PiiMasker) -> Self {
        self.masker = masker;
        self
    }

    /// Convert everything under `input` into a JSONL corpus at `output`.
    ///
    /// The input is resolved before the output file is touched, so a missing
    /// input leaves no file behind.
    pub fn run(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let documents = resolve_documents(input, &self.options.scan)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            documents = documents.len(),
            "starting conversion"
        );

        let mut writer = CorpusWriter::create(output)?;

        match self.process(&documents, &mut writer) {
            Ok(mut summary) => {
                summary.records = writer.finalize()?;
                tracing::info!(
                    records = summary.records,
                    documents = summary.documents,
                    skipped = summary.skipped.len(),
                    "conversion finished"
                );
                for redaction in &summary.redactions {
                    tracing::info!(token = %redaction.token, count = redaction.count, "redacted");
                }
                Ok(summary)
            }
            Err(e @ Error::DocumentRead { .. }) => {
                // Aborted on an unreadable document: drop the partial corpus
                writer.abandon()?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Write every document's records to `writer`, in order
    pub fn process<W: Write>(
        &self,
        documents: &[PathBuf],
        writer: &mut CorpusWriter<W>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for path in documents {
            let paragraphs = match extract(&self.reader, path) {
                Ok(paragraphs) => paragraphs,
                Err(Error::DocumentRead { path, reason })
                    if self.options.on_error == ErrorPolicy::Skip =>
                {
                    tracing::warn!(path = %path.display(), %reason, "skipping unreadable document");
                    summary.skipped.push(SkippedDocument { path, reason });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let source = source_name(path);
            for (para_idx, paragraph) in paragraphs.iter().enumerate() {
                let (text, counts) = self.masker.mask_with_counts(paragraph);
                merge_counts(&mut summary.redactions, counts);
                writer.write(&ParagraphRecord::new(text, source.clone(), para_idx))?;
            }

            tracing::debug!(source = %source, records = paragraphs.len(), "document written");
            summary.documents += 1;
        }

        summary.records = writer.count();
        Ok(summary)
    }
}

/// Convert `input` into a corpus at `output` with default settings,
/// returning the number of records written
pub fn run(input: &Path, output: &Path) -> Result<usize> {
    Pipeline::new(PipelineOptions::default())
        .run(input, output)
        .map(|summary| summary.records)
}

/// File name of `path`, as recorded in each record's `source`
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory documents keyed by file name
    struct MapReader(HashMap<&'static str, Vec<&'static str>>);

    impl DocumentReader for MapReader {
        fn read_paragraphs(&self, path: &Path) -> Result<Vec<String>> {
            let name = source_name(path);
            self.0
                .get(name.as_str())
                .map(|paras| paras.iter().map(|p| p.to_string()).collect())
                .ok_or_else(|| Error::document_read(path, "unreadable"))
        }
    }

    fn reader() -> MapReader {
        MapReader(HashMap::from([
            ("a.docx", vec!["Call 5551234567"]),
            ("b.docx", vec!["ok"]),
            ("blank.docx", vec!["Hello", "", "  ", "World"]),
        ]))
    }

    fn run_in_memory(
        pipeline: &Pipeline<MapReader>,
        documents: &[&str],
    ) -> Result<(RunSummary, Vec<ParagraphRecord>)> {
        let documents: Vec<PathBuf> =
            documents.iter().map(|d| Path::new("/docs").join(d)).collect();
        let mut writer = CorpusWriter::new(Vec::new());
        let summary = pipeline.process(&documents, &mut writer)?;
        let (_, bytes) = writer.finish()?;

        let records = String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        Ok((summary, records))
    }

    #[test]
    fn test_records_follow_document_order() {
        let pipeline = Pipeline::with_reader(reader(), PipelineOptions::default());
        let (summary, records) = run_in_memory(&pipeline, &["a.docx", "b.docx"]).unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.documents, 2);
        assert_eq!(
            records,
            vec![
                ParagraphRecord::new("Call [PHONE]", "a.docx", 0),
                ParagraphRecord::new("ok", "b.docx", 0),
            ]
        );
    }

    #[test]
    fn test_blank_paragraphs_take_no_index() {
        let pipeline = Pipeline::with_reader(reader(), PipelineOptions::default());
        let (_, records) = run_in_memory(&pipeline, &["blank.docx"]).unwrap();

        let indexed: Vec<_> = records.iter().map(|r| (r.text.as_str(), r.para_idx)).collect();
        assert_eq!(indexed, vec![("Hello", 0), ("World", 1)]);
    }

    #[test]
    fn test_skip_policy_continues() {
        let pipeline = Pipeline::with_reader(reader(), PipelineOptions::default());
        let (summary, records) =
            run_in_memory(&pipeline, &["a.docx", "missing.docx", "b.docx"]).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(summary.documents, 2);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].path, Path::new("/docs/missing.docx"));
        assert_eq!(summary.skipped[0].reason, "unreadable");
    }

    #[test]
    fn test_abort_policy_stops() {
        let options = PipelineOptions {
            on_error: ErrorPolicy::Abort,
            ..Default::default()
        };
        let pipeline = Pipeline::with_reader(reader(), options);

        let err = run_in_memory(&pipeline, &["a.docx", "missing.docx", "b.docx"]).unwrap_err();
        assert!(matches!(err, Error::DocumentRead { .. }));
    }

    #[test]
    fn test_redaction_totals() {
        let pipeline = Pipeline::with_reader(reader(), PipelineOptions::default());
        let (summary, _) = run_in_memory(&pipeline, &["a.docx", "a.docx"]).unwrap();

        assert_eq!(
            summary.redactions,
            vec![RedactionCount {
                token: "[PHONE]".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_source_name_is_file_name() {
        assert_eq!(source_name(Path::new("/a/b/report.docx")), "report.docx");
        assert_eq!(source_name(Path::new("report.docx")), "report.docx");
    }
}
