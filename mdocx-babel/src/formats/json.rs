//! JSON dump of the rendered document model
//!
//! Mostly a debugging aid: it shows exactly which blocks and styles the
//! renderer produced. Image data is left out.

use crate::docx::DocumentModel;
use crate::error::FormatError;
use crate::format::{Format, SerializedDocument};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn serialize(&self, doc: &DocumentModel) -> Result<SerializedDocument, FormatError> {
        serde_json::to_string_pretty(doc)
            .map(SerializedDocument::Text)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }
}
