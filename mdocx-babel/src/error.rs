//! Error types for the conversion pipeline
//!
//! Every stage reports failures as values. Nothing in this crate prints or
//! terminates the process; the binary decides what an error means for the
//! exit status via [`ConvertError::exit_code`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// POSIX `ENOENT`
pub const EXIT_NOT_FOUND: i32 = 2;
/// POSIX `EACCES`
pub const EXIT_PERMISSION_DENIED: i32 = 13;
/// POSIX `EISDIR`
pub const EXIT_IS_A_DIRECTORY: i32 = 21;
/// Everything that is not a classified I/O failure.
pub const EXIT_FAILURE: i32 = 1;

/// Errors raised while extracting and resolving macros.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessError {
    /// A line inside a macro block is not a mapping literal.
    #[error("Syntax error in {file} on line {line}: {text}")]
    MalformedMacro {
        file: String,
        line: usize,
        text: String,
    },
    /// A macro value refers to a token that no macro defines.
    #[error("Undefined token {token} in {file}")]
    UndefinedToken { file: String, token: String },
}

/// Errors raised while turning markup into a node tree.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("HTML parsing failed: {0}")]
    Html(#[source] io::Error),
    #[error("parsed HTML has no <body> element")]
    MissingBody,
}

/// Errors raised while rendering nodes into the document model.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image '{}': {reason}", path.display())]
    Image { path: PathBuf, reason: String },
}

/// Errors raised by output formats.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    #[error("I/O error writing '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Umbrella error for a whole conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl ConvertError {
    /// Process exit status for this error.
    ///
    /// Input access failures map onto the matching POSIX errno so callers can
    /// tell a missing file from an unreadable one; everything else is `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Read { source, .. } => io_exit_code(source),
            _ => EXIT_FAILURE,
        }
    }
}

fn io_exit_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => EXIT_NOT_FOUND,
        io::ErrorKind::PermissionDenied => EXIT_PERMISSION_DENIED,
        io::ErrorKind::IsADirectory => EXIT_IS_A_DIRECTORY,
        _ => match err.raw_os_error() {
            Some(code) if code == EXIT_IS_A_DIRECTORY => EXIT_IS_A_DIRECTORY,
            _ => EXIT_FAILURE,
        },
    }
}
