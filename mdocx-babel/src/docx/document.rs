//! `word/document.xml`

use super::model::{Block, DocumentModel, Image, PageSetup, Paragraph, Table};
use super::{
    inches_to_emu, inches_to_twips, style_id, xml_attr, xml_text, NS_MAIN, XML_DECLARATION,
};
use crate::style::Font;
use std::fmt::Write;

const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

const TOC_PLACEHOLDER: &str = "Update this field to build the table of contents.";

/// A media part an image block points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub relationship_id: String,
    /// Path inside the package, relative to `word/`.
    pub target: String,
}

/// Write the body part. `media` holds one entry per image block, in order.
pub fn document_xml(model: &DocumentModel, media: &[MediaRef]) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    let _ = write!(
        out,
        "<w:document xmlns:w=\"{NS_MAIN}\" xmlns:r=\"{NS_R}\" xmlns:wp=\"{NS_WP}\" \
         xmlns:a=\"{NS_A}\" xmlns:pic=\"{NS_PIC}\"><w:body>"
    );

    let mut images = media.iter();
    let mut drawing_id = 0;
    for block in &model.blocks {
        match block {
            Block::Heading { text, level, style } => {
                let _ = write!(
                    out,
                    "<w:p><w:pPr><w:pStyle w:val=\"{}\"/><w:outlineLvl w:val=\"{level}\"/></w:pPr>",
                    xml_attr(&style_id(style))
                );
                write_run(&mut out, text, None, false);
                out.push_str("</w:p>");
            }
            Block::Paragraph(paragraph) => write_paragraph(&mut out, paragraph),
            Block::ListItem { text, style, .. } => {
                out.push_str("<w:p>");
                if let Some(style) = style {
                    let _ = write!(
                        out,
                        "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
                        xml_attr(&style_id(style))
                    );
                }
                write_run(&mut out, text, None, false);
                out.push_str("</w:p>");
            }
            Block::Table(table) => write_table(&mut out, table, &model.page),
            Block::Image(image) => {
                if let Some(media) = images.next() {
                    drawing_id += 1;
                    write_image(&mut out, image, media, drawing_id);
                }
            }
            Block::Rule { text } => {
                out.push_str("<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>");
                write_run(&mut out, text, None, false);
                out.push_str("</w:p>");
            }
            Block::TableOfContents { instruction } => {
                let _ = write!(
                    out,
                    "<w:p><w:r><w:fldChar w:fldCharType=\"begin\" w:dirty=\"true\"/></w:r>\
                     <w:r><w:instrText xml:space=\"preserve\">{}</w:instrText></w:r>\
                     <w:r><w:fldChar w:fldCharType=\"separate\"/></w:r>\
                     <w:r><w:t>{TOC_PLACEHOLDER}</w:t></w:r>\
                     <w:r><w:fldChar w:fldCharType=\"end\"/></w:r></w:p>",
                    xml_text(instruction)
                );
            }
        }
    }

    write_section(&mut out, &model.page);
    out.push_str("</w:body></w:document>");
    out
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph) {
    out.push_str("<w:p>");
    if let Some(style) = &paragraph.style {
        let _ = write!(
            out,
            "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
            xml_attr(&style_id(style))
        );
    }
    write_run(out, &paragraph.text, None, paragraph.bold);
    out.push_str("</w:p>");
}

/// One run; newlines become line breaks inside it.
fn write_run(out: &mut String, text: &str, font: Option<&Font>, bold: bool) {
    out.push_str("<w:r>");
    if font.is_some() || bold {
        out.push_str("<w:rPr>");
        if let Some(font) = font {
            write_font(out, font, bold);
        } else {
            out.push_str("<w:b/>");
        }
        out.push_str("</w:rPr>");
    }
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push_str("<w:br/>");
        }
        let _ = write!(out, "<w:t xml:space=\"preserve\">{}</w:t>", xml_text(line));
    }
    out.push_str("</w:r>");
}

/// Run properties for `font`, in schema order.
pub(crate) fn write_font(out: &mut String, font: &Font, force_bold: bool) {
    let family = xml_attr(&font.family);
    let _ = write!(
        out,
        "<w:rFonts w:ascii=\"{family}\" w:hAnsi=\"{family}\" w:cs=\"{family}\"/>"
    );
    if font.bold || force_bold {
        out.push_str("<w:b/>");
    }
    if font.italic {
        out.push_str("<w:i/>");
    }
    if let Some(color) = &font.color {
        let _ = write!(out, "<w:color w:val=\"{}\"/>", xml_attr(color));
    }
    let size = font.half_points();
    let _ = write!(out, "<w:sz w:val=\"{size}\"/><w:szCs w:val=\"{size}\"/>");
}

fn write_table(out: &mut String, table: &Table, page: &PageSetup) {
    let columns = table.columns().max(1);
    let usable = page.width_inches - 2.0 * page.margin_inches;
    let column_width = inches_to_twips(usable / columns as f64);

    let _ = write!(
        out,
        "<w:tbl><w:tblPr><w:tblStyle w:val=\"{}\"/><w:tblW w:w=\"0\" w:type=\"auto\"/>\
         <w:tblLook w:val=\"04A0\" w:firstRow=\"{}\" w:lastRow=\"0\" w:firstColumn=\"0\" \
         w:lastColumn=\"0\" w:noHBand=\"0\" w:noVBand=\"1\"/></w:tblPr><w:tblGrid>",
        xml_attr(&style_id(&table.style)),
        u8::from(table.header_row)
    );
    for _ in 0..columns {
        let _ = write!(out, "<w:gridCol w:w=\"{column_width}\"/>");
    }
    out.push_str("</w:tblGrid>");

    for (index, row) in table.rows.iter().enumerate() {
        out.push_str("<w:tr>");
        if index == 0 && table.header_row {
            out.push_str("<w:trPr><w:tblHeader/></w:trPr>");
        }
        for cell in row {
            let _ = write!(
                out,
                "<w:tc><w:tcPr><w:tcW w:w=\"{column_width}\" w:type=\"dxa\"/></w:tcPr><w:p>"
            );
            write_run(out, cell, table.font.as_ref(), false);
            out.push_str("</w:p></w:tc>");
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
    // A table directly followed by another table would merge with it.
    out.push_str("<w:p/>");
}

fn write_image(out: &mut String, image: &Image, media: &MediaRef, id: usize) {
    let cx = inches_to_emu(image.width_inches);
    let cy = inches_to_emu(image.height_inches);
    let name = xml_attr(media.target.rsplit('/').next().unwrap_or(&media.target));
    let _ = write!(
        out,
        "<w:p><w:r><w:drawing><wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
         <wp:extent cx=\"{cx}\" cy=\"{cy}\"/><wp:docPr id=\"{id}\" name=\"Picture {id}\"/>\
         <wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>\
         <a:graphic><a:graphicData uri=\"{NS_PIC}\"><pic:pic>\
         <pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>\
         <pic:blipFill><a:blip r:embed=\"{rid}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
         <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
         </pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>",
        rid = xml_attr(&media.relationship_id),
    );
}

fn write_section(out: &mut String, page: &PageSetup) {
    let margin = inches_to_twips(page.margin_inches);
    let _ = write!(
        out,
        "<w:sectPr><w:pgSz w:w=\"{}\" w:h=\"{}\"/>\
         <w:pgMar w:top=\"{margin}\" w:right=\"{margin}\" w:bottom=\"{margin}\" w:left=\"{margin}\" \
         w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
        inches_to_twips(page.width_inches),
        inches_to_twips(page.height_inches),
    );
}
