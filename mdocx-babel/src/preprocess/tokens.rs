//! Token resolution
//!
//! A token is a bare word wrapped in double underscores (`__project__`).
//!
//! Resolution inside macro values is a single pass: each token in a value is
//! replaced by the value the referenced macro had *before* the pass started.
//! A chain `__a__ -> __b__ -> __c__` therefore leaves `__c__` in the value of
//! `__a__`. Expansion never loops, at the price of only reaching one level.
//!
//! Body substitution is plain substring replacement of every macro key, in
//! macro order. A key that happens to be a substring of a longer word is
//! replaced inside that word too.

use super::macros::MacroMap;
use super::MarkupLine;
use crate::error::PreprocessError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"__\w+__").unwrap());

pub struct TokenResolver;

impl TokenResolver {
    /// Expand tokens inside macro values, one level deep.
    pub fn resolve_macro_values(
        macros: &mut MacroMap,
        source_name: &str,
    ) -> Result<(), PreprocessError> {
        let snapshot = macros.clone();

        for entry in macros.iter_mut() {
            let tokens: Vec<String> = TOKEN_PATTERN
                .find_iter(&entry.value)
                .map(|m| m.as_str().to_string())
                .collect();

            for token in tokens {
                let replacement =
                    snapshot
                        .get(&token)
                        .ok_or_else(|| PreprocessError::UndefinedToken {
                            file: source_name.to_string(),
                            token: token.clone(),
                        })?;
                entry.value = entry.value.replace(&token, replacement);
            }
        }

        Ok(())
    }

    /// Replace every macro key occurring in a non-fenced line with its value.
    pub fn substitute_in_text(lines: &mut [MarkupLine], macros: &MacroMap) {
        for line in lines.iter_mut().filter(|line| !line.fenced) {
            for entry in macros.iter() {
                if line.text.contains(entry.key.as_str()) {
                    trace!(key = %entry.key, "substituting token");
                    line.text = line.text.replace(entry.key.as_str(), &entry.value);
                }
            }
        }
    }

    /// Tokens still present in `text`.
    pub fn unresolved_tokens(text: &str) -> Vec<&str> {
        TOKEN_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
    }
}
