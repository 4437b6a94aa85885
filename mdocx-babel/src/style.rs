//! Style tables for a single rendering run
//!
//! Everything the renderer needs to know about named document styles lives in
//! one [`StyleConfig`] value that is built per run and passed in explicitly.
//! The list style tables in particular are owned by the config, so rendering an
//! ordered list can never change what a later unordered list looks like.

use serde::Serialize;

/// Character formatting for a style or run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: String,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    /// Hex RGB without the leading `#`.
    pub color: Option<String>,
}

impl Font {
    pub fn new(family: &str, size_pt: f32) -> Self {
        Self {
            family: family.to_string(),
            size_pt,
            bold: false,
            italic: false,
            color: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, hex: &str) -> Self {
        self.color = Some(hex.to_string());
        self
    }

    /// Size in the half-point unit used by OOXML run properties.
    pub fn half_points(&self) -> u32 {
        (self.size_pt * 2.0).round() as u32
    }
}

/// Paragraph spacing in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spacing {
    pub before_pt: u32,
    pub after_pt: u32,
}

impl Spacing {
    pub const fn new(before_pt: u32, after_pt: u32) -> Self {
        Self {
            before_pt,
            after_pt,
        }
    }
}

/// A named paragraph style the document defines itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphStyle {
    pub name: String,
    pub based_on: Option<String>,
    pub font: Font,
    pub spacing: Spacing,
}

impl ParagraphStyle {
    pub fn new(name: &str, font: Font, spacing: Spacing) -> Self {
        Self {
            name: name.to_string(),
            based_on: None,
            font,
            spacing,
        }
    }

    pub fn based_on(mut self, base: &str) -> Self {
        self.based_on = Some(base.to_string());
        self
    }
}

/// Preformatted blocks: a bordered single-cell table in a monospace font.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlockStyle {
    pub table_style: String,
    pub font: Font,
}

/// Style names per list depth plus the fallback used past the last one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListStyleTable {
    pub styles: Vec<String>,
    pub glyph: String,
    pub indent: String,
    pub numbered: bool,
}

/// Leading spaces put in front of every fallback list item.
pub const FALLBACK_LEAD: &str = "        ";

impl ListStyleTable {
    pub fn unordered() -> Self {
        Self {
            styles: vec![
                "List Bullet".to_string(),
                "List Bullet 2".to_string(),
                "List Bullet 3".to_string(),
            ],
            glyph: "○  ".to_string(),
            indent: "    ".to_string(),
            numbered: false,
        }
    }

    pub fn ordered() -> Self {
        Self {
            styles: vec![
                "List Number".to_string(),
                "List Number 2".to_string(),
                "List Number 3".to_string(),
            ],
            glyph: "#  ".to_string(),
            indent: "    ".to_string(),
            numbered: true,
        }
    }

    /// Style for a zero-based depth, `None` once the table runs out.
    pub fn style_for(&self, depth: usize) -> Option<&str> {
        self.styles.get(depth).map(String::as_str)
    }

    /// Text of an item rendered past the end of the style table.
    pub fn fallback_text(&self, depth: usize, text: &str) -> String {
        format!(
            "{}{}{}{}",
            FALLBACK_LEAD,
            self.indent.repeat(depth),
            self.glyph,
            text
        )
    }
}

/// Logical roles mapped to concrete document styles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleConfig {
    pub body: ParagraphStyle,
    pub heading: ParagraphStyle,
    pub blockquote: ParagraphStyle,
    pub strong: ParagraphStyle,
    pub code: CodeBlockStyle,
    pub table: String,
    pub unordered: ListStyleTable,
    pub ordered: ListStyleTable,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            body: ParagraphStyle::new("Body Text", Font::new("Verdana", 11.0), Spacing::new(0, 0)),
            heading: ParagraphStyle::new(
                "Custom Heading",
                Font::new("Verdana", 18.0).color("000000"),
                Spacing::new(12, 6),
            )
            .based_on("Heading 2"),
            blockquote: ParagraphStyle::new(
                "Custom Quote",
                Font::new("Verdana", 11.0).italic(),
                Spacing::new(6, 6),
            ),
            strong: ParagraphStyle::new(
                "Strong Text",
                Font::new("Verdana", 11.0).bold(),
                Spacing::new(3, 3),
            ),
            code: CodeBlockStyle {
                table_style: "Table Grid".to_string(),
                font: Font::new("Courier New", 10.0),
            },
            table: "Medium Shading 1 Accent 3".to_string(),
            unordered: ListStyleTable::unordered(),
            ordered: ListStyleTable::ordered(),
        }
    }
}

impl StyleConfig {
    /// The paragraph styles this config defines outright.
    pub fn paragraph_styles(&self) -> [&ParagraphStyle; 4] {
        [&self.body, &self.heading, &self.blockquote, &self.strong]
    }

    pub fn paragraph_style(&self, name: &str) -> Option<&ParagraphStyle> {
        self.paragraph_styles()
            .into_iter()
            .find(|style| style.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_heading_derives_from_heading_two() {
        let styles = StyleConfig::default();
        assert_eq!(styles.heading.based_on.as_deref(), Some("Heading 2"));
        assert_eq!(styles.heading.font.half_points(), 36);
        assert_eq!(styles.heading.spacing, Spacing::new(12, 6));
    }

    #[test]
    fn list_tables_fall_back_past_third_level() {
        let table = ListStyleTable::unordered();
        assert_eq!(table.style_for(2), Some("List Bullet 3"));
        assert_eq!(table.style_for(3), None);
        assert_eq!(
            table.fallback_text(3, "deep"),
            format!("{FALLBACK_LEAD}            ○  deep")
        );
    }

    #[test]
    fn finds_styles_by_name() {
        let styles = StyleConfig::default();
        assert!(styles.paragraph_style("Custom Quote").is_some());
        assert!(styles.paragraph_style("List Number 2").is_none());
    }
}
