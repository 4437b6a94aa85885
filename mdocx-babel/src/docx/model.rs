//! The rendered document, independent of any file format.

use crate::style::{Font, StyleConfig};
use serde::Serialize;
use std::path::PathBuf;

/// Field instruction for a contents listing of heading levels 1 to 3.
pub const TOC_INSTRUCTION: &str = r#"TOC \o "1-3" \h \z \u"#;

/// US Letter height.
pub const DEFAULT_PAGE_HEIGHT_INCHES: f64 = 11.0;
pub const DEFAULT_MARGIN_INCHES: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Paragraph,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub text: String,
    /// `None` leaves the paragraph in the default style.
    pub style: Option<String>,
    pub bold: bool,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            bold: false,
        }
    }

    pub fn styled(text: impl Into<String>, style: &str) -> Self {
        Self {
            style: Some(style.to_string()),
            ..Self::plain(text)
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub style: String,
    /// Row-major cells; every row has the same width.
    pub rows: Vec<Vec<String>>,
    pub header_row: bool,
    /// Run formatting applied to every cell.
    pub font: Option<Font>,
}

impl Table {
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub source: PathBuf,
    /// File extension of the detected format, used for the media part.
    pub extension: String,
    pub width_inches: f64,
    pub height_inches: f64,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// One block of the output document, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        text: String,
        level: u8,
        style: String,
    },
    Paragraph(Paragraph),
    ListItem {
        text: String,
        /// Absent for items past the end of the list style table.
        style: Option<String>,
        depth: usize,
    },
    Table(Table),
    Image(Image),
    /// A centred run of rule characters.
    Rule {
        text: String,
    },
    TableOfContents {
        instruction: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSetup {
    pub width_inches: f64,
    pub height_inches: f64,
    pub margin_inches: f64,
}

impl PageSetup {
    pub fn with_width(width_inches: f64) -> Self {
        Self {
            width_inches,
            height_inches: DEFAULT_PAGE_HEIGHT_INCHES,
            margin_inches: DEFAULT_MARGIN_INCHES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentModel {
    pub blocks: Vec<Block>,
    pub styles: StyleConfig,
    pub page: PageSetup,
}

impl DocumentModel {
    pub fn new(styles: StyleConfig, page: PageSetup) -> Self {
        Self {
            blocks: Vec::new(),
            styles,
            page,
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Every style a block refers to, first use first.
    pub fn referenced_styles(&self) -> Vec<(&str, StyleKind)> {
        let mut names: Vec<(&str, StyleKind)> = Vec::new();
        for block in &self.blocks {
            let entry = match block {
                Block::Heading { style, .. } => (style.as_str(), StyleKind::Paragraph),
                Block::Paragraph(Paragraph {
                    style: Some(style), ..
                }) => (style.as_str(), StyleKind::Paragraph),
                Block::ListItem {
                    style: Some(style), ..
                } => (style.as_str(), StyleKind::Paragraph),
                Block::Table(table) => (table.style.as_str(), StyleKind::Table),
                _ => continue,
            };
            if !names.iter().any(|(name, _)| *name == entry.0) {
                names.push(entry);
            }
        }
        names
    }
}
