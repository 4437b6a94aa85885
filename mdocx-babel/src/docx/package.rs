//! The zip container

use super::document::{document_xml, MediaRef};
use super::model::{Block, DocumentModel};
use super::styles::{numbering_xml, styles_xml};
use super::{xml_attr, xml_text, NS_MAIN, XML_DECLARATION};
use crate::error::FormatError;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_WML: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml";

/// Relationship ids below this are taken by the fixed parts.
const FIRST_MEDIA_RID: usize = 4;

/// Serialize `model` into the bytes of a `.docx` file.
pub fn write_package(model: &DocumentModel) -> Result<Vec<u8>, FormatError> {
    let media: Vec<MediaRef> = model
        .images()
        .enumerate()
        .map(|(index, image)| MediaRef {
            relationship_id: format!("rId{}", FIRST_MEDIA_RID + index),
            target: format!("media/image{}.{}", index + 1, image.extension),
        })
        .collect();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let add = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, data: &[u8]| {
        add_part(zip, options, name, data)
    };

    add(&mut zip, "[Content_Types].xml", content_types(model).as_bytes())?;
    add(&mut zip, "_rels/.rels", package_rels().as_bytes())?;
    add(&mut zip, "docProps/core.xml", core_properties(model).as_bytes())?;
    add(
        &mut zip,
        "word/document.xml",
        document_xml(model, &media).as_bytes(),
    )?;
    add(
        &mut zip,
        "word/_rels/document.xml.rels",
        document_rels(&media).as_bytes(),
    )?;
    add(&mut zip, "word/styles.xml", styles_xml(model).as_bytes())?;
    add(
        &mut zip,
        "word/numbering.xml",
        numbering_xml(&model.styles).as_bytes(),
    )?;
    add(&mut zip, "word/settings.xml", settings(model).as_bytes())?;
    for (image, media) in model.images().zip(&media) {
        add(&mut zip, &format!("word/{}", media.target), &image.data)?;
    }

    let cursor = zip
        .finish()
        .map_err(|err| FormatError::SerializationError(err.to_string()))?;
    let bytes = cursor.into_inner();
    debug!(bytes = bytes.len(), images = media.len(), "wrote docx package");
    Ok(bytes)
}

fn add_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    name: &str,
    data: &[u8],
) -> Result<(), FormatError> {
    zip.start_file(name, options)
        .map_err(|err| FormatError::SerializationError(format!("{name}: {err}")))?;
    zip.write_all(data)
        .map_err(|err| FormatError::SerializationError(format!("{name}: {err}")))
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpeg" | "jpg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

fn content_types(model: &DocumentModel) -> String {
    let extensions: BTreeSet<&str> = model
        .images()
        .map(|image| image.extension.as_str())
        .collect();

    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    );
    for extension in extensions {
        let _ = write!(
            out,
            "<Default Extension=\"{}\" ContentType=\"{}\"/>",
            xml_attr(extension),
            content_type_for(extension)
        );
    }
    let _ = write!(
        out,
        "<Override PartName=\"/word/document.xml\" ContentType=\"{CT_MAIN}\"/>\
         <Override PartName=\"/word/styles.xml\" ContentType=\"{CT_WML}.styles+xml\"/>\
         <Override PartName=\"/word/numbering.xml\" ContentType=\"{CT_WML}.numbering+xml\"/>\
         <Override PartName=\"/word/settings.xml\" ContentType=\"{CT_WML}.settings+xml\"/>\
         <Override PartName=\"/docProps/core.xml\" \
         ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>"
    );
    out.push_str("</Types>");
    out
}

fn package_rels() -> String {
    format!(
        "{XML_DECLARATION}<Relationships xmlns=\"{NS_PKG_RELS}\">\
         <Relationship Id=\"rId1\" Type=\"{REL_BASE}/officeDocument\" Target=\"word/document.xml\"/>\
         <Relationship Id=\"rId2\" \
         Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" \
         Target=\"docProps/core.xml\"/></Relationships>"
    )
}

fn document_rels(media: &[MediaRef]) -> String {
    let mut out = format!(
        "{XML_DECLARATION}<Relationships xmlns=\"{NS_PKG_RELS}\">\
         <Relationship Id=\"rId1\" Type=\"{REL_BASE}/styles\" Target=\"styles.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_BASE}/numbering\" Target=\"numbering.xml\"/>\
         <Relationship Id=\"rId3\" Type=\"{REL_BASE}/settings\" Target=\"settings.xml\"/>"
    );
    for item in media {
        let _ = write!(
            out,
            "<Relationship Id=\"{}\" Type=\"{REL_BASE}/image\" Target=\"{}\"/>",
            xml_attr(&item.relationship_id),
            xml_attr(&item.target)
        );
    }
    out.push_str("</Relationships>");
    out
}

fn settings(model: &DocumentModel) -> String {
    let has_fields = model
        .blocks
        .iter()
        .any(|block| matches!(block, Block::TableOfContents { .. }));
    let update = if has_fields {
        "<w:updateFields w:val=\"true\"/>"
    } else {
        ""
    };
    format!("{XML_DECLARATION}<w:settings xmlns:w=\"{NS_MAIN}\">{update}</w:settings>")
}

fn core_properties(model: &DocumentModel) -> String {
    let title = model
        .blocks
        .iter()
        .find_map(|block| match block {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .unwrap_or_default();
    format!(
        "{XML_DECLARATION}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\"><dc:title>{}</dc:title>\
         <dc:creator>mdocx</dc:creator></cp:coreProperties>",
        xml_text(title)
    )
}
