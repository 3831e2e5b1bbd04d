pub mod collection;
pub mod denylist;
pub mod docx;
pub mod paragraphs;
pub mod reader;

pub use collection::{ScanOptions, resolve_documents};
pub use denylist::Denylist;
pub use docx::{DocxDocument, DocxError, DocxReader};
pub use paragraphs::{extract, trim_and_filter};
pub use reader::DocumentReader;
