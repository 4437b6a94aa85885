//! Document publishing pipeline.
//!
//! Bridges the format registry and file I/O: pick a format, serialize the
//! rendered model, and either write the result to disk or hand it back.
//!
//! For more control over the conversion process, use [`FormatRegistry`] directly.

use crate::docx::DocumentModel;
use crate::error::FormatError;
use crate::format::SerializedDocument;
use crate::registry::FormatRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Specifies how to publish a document.
///
/// ```ignore
/// let spec = PublishSpec::new(&model, "docx").with_output_path("report.docx");
/// ```
///
/// If no output path is provided, text formats return in-memory content.
/// Binary formats (like docx) require an explicit output path.
#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub document: &'a DocumentModel,
    /// Target format name (e.g., "docx", "json").
    pub format: &'a str,
    /// Optional file path for writing output. Required for binary formats.
    pub output: Option<PathBuf>,
}

impl<'a> PublishSpec<'a> {
    pub fn new(document: &'a DocumentModel, format: &'a str) -> Self {
        Self {
            document,
            format,
            output: None,
        }
    }

    /// Sets the output file path. If provided, content is written to disk.
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }
}

/// The output from a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    /// Content held in memory (for text formats without an output path).
    InMemory(String),
    /// Path to the written file (when output path was specified).
    File(PathBuf),
}

/// Publishes a document according to the specification.
///
/// # Errors
///
/// Returns [`FormatError`] if:
/// - The format is not registered
/// - Serialization fails
/// - Writing the output file fails
/// - A binary format is requested without an output path
pub fn publish(spec: PublishSpec<'_>) -> Result<PublishArtifact, FormatError> {
    let registry = FormatRegistry::with_defaults();
    let serialized = registry.serialize(spec.document, spec.format)?;
    match (serialized, spec.output) {
        (serialized, Some(path)) => write_to_path(path, serialized.into_bytes()),
        (SerializedDocument::Text(text), None) => Ok(PublishArtifact::InMemory(text)),
        (SerializedDocument::Binary(_), None) => Err(FormatError::SerializationError(
            "binary formats require an explicit output path".to_string(),
        )),
    }
}

fn write_to_path(path: PathBuf, bytes: Vec<u8>) -> Result<PublishArtifact, FormatError> {
    fs::write(&path, &bytes).map_err(|source| FormatError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(PublishArtifact::File(path))
}
