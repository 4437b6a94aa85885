//! Macro block extraction
//!
//! A document declares its macros in one delimited block, usually hidden from
//! markdown renderers inside an HTML comment:
//!
//! ```text
//! <!--
//! MaCrOs
//! # comments and blank lines are ignored
//! {'__project__': 'Apollo'}
//! {'__title__': '__project__ status report'}
//! END_MaCrOs
//! -->
//! ```
//!
//! The delimiter lines stay in the body (so the comment stays balanced), the
//! lines between them do not.

use super::literal::parse_mapping_literal;
use super::{MarkupLine, PreprocessOptions};
use crate::error::PreprocessError;
use serde::Serialize;
use tracing::trace;

/// One macro definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroEntry {
    pub key: String,
    pub value: String,
}

/// Macro definitions in first-definition order.
///
/// Redefining a key replaces its value but keeps its original position, so
/// body substitution always applies keys in the order they first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MacroMap {
    entries: Vec<MacroEntry>,
}

impl MacroMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a definition.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(MacroEntry { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MacroEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut MacroEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MacroMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = MacroMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Single-pass reader for the macro block.
pub struct MacroStore<'a> {
    options: &'a PreprocessOptions,
}

impl<'a> MacroStore<'a> {
    pub fn new(options: &'a PreprocessOptions) -> Self {
        Self { options }
    }

    /// Split `lines` into the macro table and the remaining body.
    ///
    /// `source_name` only feeds diagnostics.
    pub fn parse<'l, I>(
        &self,
        lines: I,
        source_name: &str,
    ) -> Result<(MacroMap, Vec<MarkupLine>), PreprocessError>
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut macros = MacroMap::new();
        let mut body = Vec::new();
        let mut in_block = false;
        let mut in_fence = false;

        for (index, raw) in lines.into_iter().enumerate() {
            let trimmed = raw.trim();

            if trimmed.starts_with(self.options.fence.as_str()) {
                in_fence = !in_fence;
                body.push(MarkupLine::fenced(raw));
                continue;
            }
            if in_fence {
                body.push(MarkupLine::fenced(raw));
                continue;
            }

            if trimmed.starts_with(self.options.macro_end.as_str()) {
                in_block = false;
                body.push(MarkupLine::new(raw));
                continue;
            }
            if trimmed.starts_with(self.options.macro_start.as_str()) {
                in_block = true;
                body.push(MarkupLine::new(raw));
                continue;
            }

            if !in_block {
                body.push(MarkupLine::new(raw));
                continue;
            }

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
                continue;
            }

            let entries =
                parse_mapping_literal(trimmed).ok_or_else(|| PreprocessError::MalformedMacro {
                    file: source_name.to_string(),
                    line: index + 1,
                    text: trimmed.to_string(),
                })?;
            for (key, value) in entries {
                trace!(%key, %value, line = index + 1, "macro definition");
                macros.insert(key, value);
            }
        }

        Ok((macros, body))
    }
}
