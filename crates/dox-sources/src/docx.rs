//! DOCX reader
//!
//! A `.docx` file is a ZIP package; the paragraphs live in the main document
//! part (normally `word/document.xml`). Only `w:p` elements directly under
//! `w:body` count as paragraphs, so table cells and text boxes are skipped.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use dox_core::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::reader::DocumentReader;

const PACKAGE_RELS: &str = "_rels/.rels";
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("not a valid document package: {0}")]
    Zip(#[from] ZipError),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing document part '{0}'")]
    MissingPart(String),
}

/// An opened DOCX document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxDocument {
    paragraphs: Vec<String>,
}

impl DocxDocument {
    /// Open and parse the document at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::document_read(path, e))?;
        Self::from_reader(file).map_err(|e| Error::document_read(path, e))
    }

    /// Parse a document package from any seekable source
    pub fn from_reader<R: Read + Seek>(reader: R) -> std::result::Result<Self, DocxError> {
        let mut archive = ZipArchive::new(reader)?;

        let main_part = find_main_part(&mut archive)?;
        let xml = read_part(&mut archive, &main_part)?
            .ok_or_else(|| DocxError::MissingPart(main_part.clone()))?;

        Ok(Self {
            paragraphs: parse_body_paragraphs(&xml)?,
        })
    }

    /// Paragraph texts in document order, untrimmed
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }
}

/// Reads `.docx` files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxReader;

impl DocumentReader for DocxReader {
    fn read_paragraphs(&self, path: &Path) -> Result<Vec<String>> {
        Ok(DocxDocument::open(path)?.paragraphs().to_vec())
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> std::result::Result<Option<String>, DocxError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Locate the main document part through the package relationships
fn find_main_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> std::result::Result<String, DocxError> {
    let Some(rels) = read_part(archive, PACKAGE_RELS)? else {
        return Ok(DEFAULT_MAIN_PART.to_string());
    };

    let mut reader = Reader::from_str(&rels);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut rel_type = None;
                let mut target = None;

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel_type = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }

                if let (Some(rel_type), Some(target)) = (rel_type, target)
                    && rel_type.ends_with(OFFICE_DOCUMENT_REL)
                {
                    return Ok(target.trim_start_matches('/').to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(DEFAULT_MAIN_PART.to_string())
}

/// Text of each body-level paragraph in `xml`, in order
pub(crate) fn parse_body_paragraphs(xml: &str) -> std::result::Result<Vec<String>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut parser = BodyParser::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => parser.start(&e),
            Event::Empty(e) => parser.empty(&e),
            Event::End(_) => parser.end(),
            Event::Text(e) => {
                if parser.in_text() {
                    parser.push_str(&e.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.paragraphs)
}

#[derive(Default)]
struct BodyParser {
    stack: Vec<Vec<u8>>,
    /// Stack depth of the open body paragraph and its text so far
    current: Option<(usize, String)>,
    paragraphs: Vec<String>,
}

impl BodyParser {
    fn start(&mut self, e: &BytesStart<'_>) {
        let name = e.name().as_ref().to_vec();

        if self.opens_body_paragraph(&name) {
            self.current = Some((self.stack.len() + 1, String::new()));
        } else {
            self.run_content(e);
        }

        self.stack.push(name);
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        if self.opens_body_paragraph(e.name().as_ref()) {
            self.paragraphs.push(String::new());
        } else {
            self.run_content(e);
        }
    }

    fn end(&mut self) {
        let closes_current =
            matches!(&self.current, Some((depth, _)) if *depth == self.stack.len());

        if closes_current && let Some((_, text)) = self.current.take() {
            self.paragraphs.push(text);
        }
        self.stack.pop();
    }

    fn opens_body_paragraph(&self, name: &[u8]) -> bool {
        name == b"w:p"
            && self.current.is_none()
            && self.stack.last().is_some_and(|parent| parent == b"w:body")
    }

    /// True when the innermost open paragraph is the body paragraph
    fn in_body_paragraph(&self) -> bool {
        match &self.current {
            Some((depth, _)) => !self.stack[*depth..].iter().any(|n| n == b"w:p"),
            None => false,
        }
    }

    fn in_text(&self) -> bool {
        self.in_body_paragraph() && self.stack.last().is_some_and(|n| n == b"w:t")
    }

    fn push_str(&mut self, s: &str) {
        if let Some((_, text)) = &mut self.current {
            text.push_str(s);
        }
    }

    /// Inline run children that stand for characters
    fn run_content(&mut self, e: &BytesStart<'_>) {
        if !self.in_body_paragraph() || !self.stack.last().is_some_and(|n| n == b"w:r") {
            return;
        }

        let ch = match e.name().as_ref() {
            b"w:tab" | b"w:ptab" => '\t',
            b"w:cr" => '\n',
            b"w:noBreakHyphen" => '-',
            b"w:br" if is_line_break(e) => '\n',
            _ => return,
        };

        if let Some((_, text)) = &mut self.current {
            text.push(ch);
        }
    }
}

/// Page and column breaks carry no text
fn is_line_break(e: &BytesStart<'_>) -> bool {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"w:type")
        .is_none_or(|attr| attr.value.as_ref() == b"textWrapping")
}
