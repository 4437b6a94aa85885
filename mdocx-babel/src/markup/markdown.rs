//! Markdown → HTML
//!
//! The preprocessed markdown is handed to comrak as a whole. GFM tables are
//! enabled and raw HTML is passed through untouched, so the comment wrapping a
//! macro block survives and authors can embed inline HTML.

use comrak::{markdown_to_html, ComrakOptions};

/// Render markdown to an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    markdown_to_html(markdown, &default_comrak_options())
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.render.unsafe_ = true;
    options
}
