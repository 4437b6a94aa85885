//! Format trait definition
//!
//! An output format turns a rendered [`DocumentModel`] into bytes. Every
//! format is looked up by name through the
//! [`FormatRegistry`](crate::registry::FormatRegistry).

use crate::docx::DocumentModel;
use crate::error::FormatError;

/// Serialized output produced by a [`Format`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedDocument {
    /// UTF-8 text output (e.g. the JSON model dump)
    Text(String),
    /// Binary output (e.g. a docx package)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }
}

/// An output format for rendered documents.
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "docx", "json")
    fn name(&self) -> &str;

    /// File extensions without the leading dot, used to pick a format from an
    /// output path.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn serialize(&self, doc: &DocumentModel) -> Result<SerializedDocument, FormatError>;
}
