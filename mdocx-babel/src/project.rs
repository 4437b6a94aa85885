//! Input and output paths derived from a project name
//!
//! A project `report` reads `report.md`, may dump the intermediate HTML to
//! `report.html`, and writes `report.docx`. Passing `report.md` names the same
//! project.

use crate::error::ConvertError;
use std::fs;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub input: PathBuf,
    pub html: PathBuf,
    pub output: PathBuf,
}

impl Project {
    pub fn from_arg(arg: &str) -> Project {
        let path = Path::new(arg);
        let base = match path.extension().and_then(|ext| ext.to_str()) {
            Some(MARKDOWN_EXTENSION) => path.with_extension(""),
            _ => path.to_path_buf(),
        };
        Project {
            input: with_suffix(&base, MARKDOWN_EXTENSION),
            html: with_suffix(&base, "html"),
            output: with_suffix(&base, "docx"),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Project {
        self.output = output.into();
        self
    }

    /// Directory relative references in the document resolve against.
    pub fn base_dir(&self) -> PathBuf {
        match self.input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Display name used in diagnostics.
    pub fn source_name(&self) -> String {
        self.input.display().to_string()
    }

    pub fn read_source(&self) -> Result<String, ConvertError> {
        fs::read_to_string(&self.input).map_err(|source| ConvertError::Read {
            path: self.input.clone(),
            source,
        })
    }
}

// Appends rather than replaces, so `v1.2` becomes `v1.2.md`.
fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
