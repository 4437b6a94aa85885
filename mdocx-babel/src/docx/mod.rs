//! Office Open XML output
//!
//! [`model`] holds the format-independent [`DocumentModel`]. The remaining
//! modules write it out as a WordprocessingML package:
//!
//! - `document`: the body part, one element per block
//! - `styles`: style and numbering definitions
//! - `package`: the zip container with relationships and metadata
//!
//! Only the parts a minimal document needs are produced. Fields are marked for
//! update so a contents listing is filled in when the file is first opened.

mod document;
pub mod model;
mod package;
mod styles;

pub use model::{Block, DocumentModel, Image, PageSetup, Paragraph, StyleKind, Table};
pub use package::write_package;

pub(crate) const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const TWIPS_PER_INCH: f64 = 1440.0;
const TWIPS_PER_POINT: u32 = 20;
const EMU_PER_INCH: f64 = 914_400.0;

pub(crate) fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH).round() as u32
}

pub(crate) fn points_to_twips(points: u32) -> u32 {
    points * TWIPS_PER_POINT
}

pub(crate) fn inches_to_emu(inches: f64) -> u64 {
    (inches * EMU_PER_INCH).round() as u64
}

/// OOXML style id for a display name: the name without spaces or punctuation.
pub fn style_id(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Escape text content, dropping characters XML 1.0 cannot carry.
pub(crate) fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| c >= ' ' || c == '\t' || c == '\n' || c == '\r')
        .collect();
    html_escape::encode_text(&cleaned).into_owned()
}

pub(crate) fn xml_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}
