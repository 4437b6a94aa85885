//! Word processing document output

use crate::docx::{write_package, DocumentModel};
use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxFormat;

impl Format for DocxFormat {
    fn name(&self) -> &str {
        "docx"
    }

    fn file_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn serialize(&self, doc: &DocumentModel) -> Result<SerializedDocument, FormatError> {
        write_package(doc).map(SerializedDocument::Binary)
    }
}
