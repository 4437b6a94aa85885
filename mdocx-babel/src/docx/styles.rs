//! `word/styles.xml` and `word/numbering.xml`

use super::document::write_font;
use super::model::{DocumentModel, StyleKind};
use super::{points_to_twips, style_id, xml_attr, NS_MAIN, XML_DECLARATION};
use crate::style::{ListStyleTable, ParagraphStyle, StyleConfig};
use std::fmt::Write;

/// Accent 3 of the default Office theme.
const ACCENT_3: &str = "9BBB59";

pub const BULLET_NUM_ID: u32 = 1;
pub const DECIMAL_NUM_ID: u32 = 2;

const BULLET_GLYPHS: [&str; 3] = ["\u{2022}", "\u{25E6}", "\u{25AA}"];

/// Every style the model can refer to, plus plain definitions for the rest.
pub fn styles_xml(model: &DocumentModel) -> String {
    let styles = &model.styles;
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    let _ = write!(out, "<w:styles xmlns:w=\"{NS_MAIN}\">");
    out.push_str(
        "<w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val=\"22\"/><w:szCs w:val=\"22\"/>\
         </w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after=\"160\"/></w:pPr>\
         </w:pPrDefault></w:docDefaults>",
    );
    out.push_str(
        "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">\
         <w:name w:val=\"Normal\"/><w:qFormat/></w:style>",
    );
    out.push_str(
        "<w:style w:type=\"table\" w:default=\"1\" w:styleId=\"TableNormal\">\
         <w:name w:val=\"Normal Table\"/><w:tblPr><w:tblInd w:w=\"0\" w:type=\"dxa\"/>\
         <w:tblCellMar><w:top w:w=\"0\" w:type=\"dxa\"/><w:left w:w=\"108\" w:type=\"dxa\"/>\
         <w:bottom w:w=\"0\" w:type=\"dxa\"/><w:right w:w=\"108\" w:type=\"dxa\"/></w:tblCellMar>\
         </w:tblPr></w:style>",
    );

    let mut defined: Vec<String> = vec!["Normal".to_string(), "Normal Table".to_string()];

    for style in styles.paragraph_styles() {
        if let Some(base) = &style.based_on {
            if styles.paragraph_style(base).is_none() && !defined.contains(base) {
                write_plain_style(&mut out, base, StyleKind::Paragraph);
                defined.push(base.clone());
            }
        }
        if !defined.contains(&style.name) {
            write_paragraph_style(&mut out, style);
            defined.push(style.name.clone());
        }
    }

    for (table, num_id) in [
        (&styles.unordered, BULLET_NUM_ID),
        (&styles.ordered, DECIMAL_NUM_ID),
    ] {
        for (depth, name) in table.styles.iter().enumerate() {
            if !defined.contains(name) {
                write_list_style(&mut out, name, depth, num_id);
                defined.push(name.clone());
            }
        }
    }

    if !defined.contains(&styles.code.table_style) {
        write_table_style(&mut out, &styles.code.table_style, None);
        defined.push(styles.code.table_style.clone());
    }
    if !defined.contains(&styles.table) {
        write_table_style(&mut out, &styles.table, Some(ACCENT_3));
        defined.push(styles.table.clone());
    }

    for (name, kind) in model.referenced_styles() {
        if !defined.iter().any(|known| known == name) {
            write_plain_style(&mut out, name, kind);
            defined.push(name.to_string());
        }
    }

    out.push_str("</w:styles>");
    out
}

fn write_paragraph_style(out: &mut String, style: &ParagraphStyle) {
    let _ = write!(
        out,
        "<w:style w:type=\"paragraph\" w:customStyle=\"1\" w:styleId=\"{}\"><w:name w:val=\"{}\"/>",
        xml_attr(&style_id(&style.name)),
        xml_attr(&style.name)
    );
    let base = style.based_on.as_deref().unwrap_or("Normal");
    let _ = write!(
        out,
        "<w:basedOn w:val=\"{}\"/><w:qFormat/><w:pPr><w:spacing w:before=\"{}\" w:after=\"{}\"/></w:pPr><w:rPr>",
        xml_attr(&style_id(base)),
        points_to_twips(style.spacing.before_pt),
        points_to_twips(style.spacing.after_pt)
    );
    write_font(out, &style.font, false);
    out.push_str("</w:rPr></w:style>");
}

fn write_list_style(out: &mut String, name: &str, depth: usize, num_id: u32) {
    let _ = write!(
        out,
        "<w:style w:type=\"paragraph\" w:styleId=\"{}\"><w:name w:val=\"{}\"/>\
         <w:basedOn w:val=\"Normal\"/><w:pPr><w:numPr><w:ilvl w:val=\"{depth}\"/>\
         <w:numId w:val=\"{num_id}\"/></w:numPr><w:contextualSpacing/></w:pPr></w:style>",
        xml_attr(&style_id(name)),
        xml_attr(name)
    );
}

fn write_table_style(out: &mut String, name: &str, header_fill: Option<&str>) {
    let _ = write!(
        out,
        "<w:style w:type=\"table\" w:styleId=\"{}\"><w:name w:val=\"{}\"/>\
         <w:basedOn w:val=\"TableNormal\"/><w:pPr><w:spacing w:after=\"0\"/></w:pPr><w:tblPr><w:tblBorders>",
        xml_attr(&style_id(name)),
        xml_attr(name)
    );
    let color = header_fill.unwrap_or("auto");
    for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        let _ = write!(
            out,
            "<w:{edge} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{color}\"/>"
        );
    }
    out.push_str("</w:tblBorders></w:tblPr>");
    if let Some(fill) = header_fill {
        let _ = write!(
            out,
            "<w:tblStylePr w:type=\"firstRow\"><w:rPr><w:b/><w:color w:val=\"FFFFFF\"/></w:rPr>\
             <w:tcPr><w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{fill}\"/></w:tcPr></w:tblStylePr>"
        );
    }
    out.push_str("</w:style>");
}

/// A definition with nothing but a name, for styles the run does not describe.
fn write_plain_style(out: &mut String, name: &str, kind: StyleKind) {
    let (kind, base) = match kind {
        StyleKind::Paragraph => ("paragraph", "Normal"),
        StyleKind::Table => ("table", "TableNormal"),
    };
    let _ = write!(
        out,
        "<w:style w:type=\"{kind}\" w:styleId=\"{}\"><w:name w:val=\"{}\"/><w:basedOn w:val=\"{base}\"/></w:style>",
        xml_attr(&style_id(name)),
        xml_attr(name)
    );
}

/// Bullet and decimal list definitions, one level per list style.
pub fn numbering_xml(styles: &StyleConfig) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    let _ = write!(out, "<w:numbering xmlns:w=\"{NS_MAIN}\">");
    write_abstract(&mut out, 0, &styles.unordered);
    write_abstract(&mut out, 1, &styles.ordered);
    let _ = write!(
        out,
        "<w:num w:numId=\"{BULLET_NUM_ID}\"><w:abstractNumId w:val=\"0\"/></w:num>\
         <w:num w:numId=\"{DECIMAL_NUM_ID}\"><w:abstractNumId w:val=\"1\"/></w:num>"
    );
    out.push_str("</w:numbering>");
    out
}

fn write_abstract(out: &mut String, id: u32, table: &ListStyleTable) {
    let _ = write!(
        out,
        "<w:abstractNum w:abstractNumId=\"{id}\"><w:multiLevelType w:val=\"hybridMultilevel\"/>"
    );
    for level in 0..table.styles.len().max(1) {
        let (format, text) = if table.numbered {
            ("decimal", format!("%{}.", level + 1))
        } else {
            ("bullet", BULLET_GLYPHS[level % BULLET_GLYPHS.len()].to_string())
        };
        let left = 720 * (level + 1);
        let _ = write!(
            out,
            "<w:lvl w:ilvl=\"{level}\"><w:start w:val=\"1\"/><w:numFmt w:val=\"{format}\"/>\
             <w:lvlText w:val=\"{text}\"/><w:lvlJc w:val=\"left\"/>\
             <w:pPr><w:ind w:left=\"{left}\" w:hanging=\"360\"/></w:pPr></w:lvl>"
        );
    }
    out.push_str("</w:abstractNum>");
}
