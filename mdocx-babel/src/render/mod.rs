//! Node tree → DocumentModel
//!
//!     The renderer walks the top-level body nodes in order. Each node is first checked for the
//!     table-of-contents indicator, then classified into a [`BlockKind`] and handed to the
//!     matching emitter. Nested content is only looked at by the emitter that owns it (lists,
//!     tables, images).
//!
//! Table of contents
//!
//!     The indicator is searched for in the lowercased markup of every node. The first hit is
//!     usually the heading introducing the section, so only the second hit inserts the contents
//!     field, right before that node. The node itself is rendered normally either way, and later
//!     hits do nothing.
//!
//! Failure policy
//!
//!     Rendering does not abort on odd input. Tables without a header are dropped with a warning,
//!     ragged tables are padded, unknown nodes are skipped. The one exception is an unreadable
//!     image under [`MissingImagePolicy::Fail`].

pub mod blocks;
pub mod image;
pub mod list;
pub mod table;

pub use blocks::{BlockKind, ListKind};
pub use image::{MissingImagePolicy, Placement};
pub use list::{ListEvent, ListWalker};
pub use table::TableShape;

use crate::docx::model::{Block, DocumentModel, PageSetup, Paragraph, Table, TOC_INSTRUCTION};
use crate::error::RenderError;
use crate::markup::node::find_all;
use crate::markup::{Element, SemanticNode};
use crate::style::StyleConfig;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Layout knobs for one rendering run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub page_width_inches: f64,
    /// Largest share of the page width an image may take.
    pub picture_fraction: f64,
    /// Pixel density assumed for every image.
    pub assumed_ppi: f64,
    pub toc_indicator: String,
    pub rule_length: usize,
    pub rule_char: char,
    pub on_missing_image: MissingImagePolicy,
    /// Directory relative image paths are resolved against.
    pub base_dir: PathBuf,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_width_inches: 8.5,
            picture_fraction: 0.7,
            assumed_ppi: 200.0,
            toc_indicator: "contents".to_string(),
            rule_length: 80,
            rule_char: '_',
            on_missing_image: MissingImagePolicy::Skip,
            base_dir: PathBuf::from("."),
        }
    }
}

impl RenderOptions {
    pub fn max_image_width(&self) -> f64 {
        self.page_width_inches * self.picture_fraction
    }
}

/// Renders body nodes into a [`DocumentModel`].
pub struct DocumentRenderer<'a> {
    options: &'a RenderOptions,
    styles: &'a StyleConfig,
}

/// Per-run walk state.
struct RenderState<'n> {
    model: DocumentModel,
    tables: Vec<&'n Element>,
    next_table: usize,
    toc_matches: usize,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(options: &'a RenderOptions, styles: &'a StyleConfig) -> Self {
        Self { options, styles }
    }

    pub fn render(&self, nodes: &[SemanticNode]) -> Result<DocumentModel, RenderError> {
        let mut state = RenderState {
            model: DocumentModel::new(
                self.styles.clone(),
                PageSetup::with_width(self.options.page_width_inches),
            ),
            tables: find_all(nodes, "table"),
            next_table: 0,
            toc_matches: 0,
        };
        let indicator = self.options.toc_indicator.to_lowercase();

        for node in nodes.iter().filter(|node| !node.is_blank_text()) {
            if !indicator.is_empty()
                && state.toc_matches < 2
                && node.outer_html().to_lowercase().contains(&indicator)
            {
                state.toc_matches += 1;
                if state.toc_matches == 2 {
                    debug!("inserting table of contents");
                    state.model.push(Block::TableOfContents {
                        instruction: TOC_INSTRUCTION.to_string(),
                    });
                }
            }
            self.render_node(node, &mut state)?;
        }

        debug!(blocks = state.model.blocks.len(), "rendered document");
        Ok(state.model)
    }

    fn render_node<'n>(
        &self,
        node: &'n SemanticNode,
        state: &mut RenderState<'n>,
    ) -> Result<(), RenderError> {
        let kind = BlockKind::classify(node);
        let element = match node {
            SemanticNode::Element(element) => element,
            SemanticNode::Text(text) => {
                if kind == BlockKind::Text {
                    state.model.push(Block::Paragraph(Paragraph::styled(
                        text.trim(),
                        &self.styles.body.name,
                    )));
                }
                return Ok(());
            }
        };
        match kind {
            BlockKind::Text | BlockKind::Unhandled => {
                debug!(tag = %element.tag, "skipping unhandled element");
            }
            BlockKind::Heading(level) => {
                state.model.push(Block::Heading {
                    text: element.text_content().trim().to_string(),
                    level,
                    style: self.styles.heading.name.clone(),
                });
            }
            BlockKind::EmphasisParagraph => {
                let text = element.text_content();
                let text = text.trim();
                if text.is_empty() {
                    debug!("skipping empty emphasis paragraph");
                } else {
                    state.model.push(Block::Paragraph(Paragraph::styled(
                        text,
                        &self.styles.body.name,
                    )));
                }
            }
            BlockKind::Rule => {
                let text = self.options.rule_char.to_string().repeat(self.options.rule_length);
                state.model.push(Block::Rule { text });
            }
            BlockKind::Image => self.render_image(element, state)?,
            BlockKind::Paragraph => {
                let mut paragraph =
                    Paragraph::styled(element.text_content().trim(), &self.styles.body.name);
                if element.contains("strong") {
                    paragraph = paragraph.bold();
                }
                state.model.push(Block::Paragraph(paragraph));
            }
            BlockKind::CodeBlock => {
                let text = element.text_content();
                let text = text.strip_suffix('\n').unwrap_or(&text);
                state.model.push(Block::Table(Table {
                    style: self.styles.code.table_style.clone(),
                    rows: vec![vec![text.to_string()]],
                    header_row: false,
                    font: Some(self.styles.code.font.clone()),
                }));
            }
            BlockKind::Table => self.render_table(state),
            BlockKind::List(kind) => {
                let table = match kind {
                    ListKind::Unordered => &self.styles.unordered,
                    ListKind::Ordered => &self.styles.ordered,
                };
                for block in ListWalker::new(table).walk(node) {
                    state.model.push(block);
                }
            }
            BlockKind::Blockquote => {
                state.model.push(Block::Paragraph(Paragraph::styled(
                    element.text_content().trim(),
                    &self.styles.blockquote.name,
                )));
            }
            BlockKind::Strong => {
                state.model.push(Block::Paragraph(
                    Paragraph::styled(element.text_content().trim(), &self.styles.strong.name)
                        .bold(),
                ));
            }
        }
        Ok(())
    }

    fn render_table(&self, state: &mut RenderState<'_>) {
        let Some(table) = state.tables.get(state.next_table).copied() else {
            warn!("table without a matching pre-scanned table, skipping");
            return;
        };
        state.next_table += 1;
        match TableShape::read(table) {
            Some(shape) => state
                .model
                .push(Block::Table(shape.into_table(&self.styles.table))),
            None => warn!("table has no header cells, skipping"),
        }
    }

    fn render_image(
        &self,
        element: &Element,
        state: &mut RenderState<'_>,
    ) -> Result<(), RenderError> {
        let Some(src) = element.find("img").and_then(|img| img.attr("src")) else {
            warn!("image without a source, skipping");
            return Ok(());
        };
        let loaded = image::resolve_source(src, &self.options.base_dir).and_then(|path| {
            image::load_image(
                &path,
                self.options.assumed_ppi,
                self.options.max_image_width(),
            )
            .map_err(|reason| format!("{}: {reason}", path.display()))
        });

        match loaded {
            Ok(image) => {
                debug!(
                    source = %image.source.display(),
                    width = image.width_inches,
                    height = image.height_inches,
                    "image"
                );
                state.model.push(Block::Image(image));
                Ok(())
            }
            Err(reason) => match self.options.on_missing_image {
                MissingImagePolicy::Skip => {
                    warn!(%src, %reason, "skipping image");
                    Ok(())
                }
                MissingImagePolicy::Fail => Err(RenderError::Image {
                    path: PathBuf::from(src),
                    reason,
                }),
            },
        }
    }
}
