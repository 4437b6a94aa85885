//! Package tests: the kitchensink written out and read back as a docx.

use crate::common::{fixture, fixtures_dir, Echo};
use mdocx_babel::docx::write_package;
use mdocx_babel::{
    convert_source_with, publish, ConvertOptions, DocumentModel, PublishArtifact, PublishSpec,
};
use std::collections::BTreeSet;
use std::io::{Cursor, Read};

const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn kitchensink_model() -> DocumentModel {
    let mut options = ConvertOptions::default();
    options.render.base_dir = fixtures_dir();
    convert_source_with(
        &fixture("kitchensink.md"),
        "kitchensink.md",
        &options,
        &mut Echo::default(),
    )
    .expect("conversion")
    .model
}

fn read_part(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
    let mut file = archive.by_name(name).expect(name);
    let mut out = Vec::new();
    file.read_to_end(&mut out).expect("read part");
    out
}

fn read_text(bytes: &[u8], name: &str) -> String {
    String::from_utf8(read_part(bytes, name)).expect("utf-8 part")
}

fn attr_values(xml: &str, tag: &str, attr: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).expect("well formed");
    doc.descendants()
        .filter(|n| n.has_tag_name((W, tag)))
        .filter_map(|n| n.attribute((W, attr)).map(str::to_string))
        .collect()
}

#[test]
fn every_referenced_style_is_defined() {
    let bytes = write_package(&kitchensink_model()).unwrap();
    let document = read_text(&bytes, "word/document.xml");
    let styles = read_text(&bytes, "word/styles.xml");

    let defined: BTreeSet<String> = attr_values(&styles, "style", "styleId").into_iter().collect();
    let mut referenced = attr_values(&document, "pStyle", "val");
    referenced.extend(attr_values(&document, "tblStyle", "val"));
    assert!(!referenced.is_empty());
    for id in referenced {
        assert!(defined.contains(&id), "style {id} is used but not defined");
    }
}

#[test]
fn body_text_follows_document_order() {
    let bytes = write_package(&kitchensink_model()).unwrap();
    let document = read_text(&bytes, "word/document.xml");
    let doc = roxmltree::Document::parse(&document).unwrap();
    let texts: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name((W, "t")))
        .filter_map(|n| n.text())
        .collect();

    let position = |needle: &str| {
        texts
            .iter()
            .position(|t| t.contains(needle))
            .unwrap_or_else(|| panic!("{needle} not in document"))
    };
    assert!(position("Apollo Handbook") < position("Table of Contents"));
    assert!(position("Table of Contents") < position("Overview"));
    assert!(position("Quoted guidance") < position("First step"));
    assert!(position("level three") < position("level four"));
    assert!(position("level four") < position("raw __project__"));
}

#[test]
fn contents_field_sits_before_the_second_match() {
    let bytes = write_package(&kitchensink_model()).unwrap();
    let document = read_text(&bytes, "word/document.xml");
    let field = document.find("TOC \\o").expect("toc instruction");
    let heading = document.find(">Table of Contents<").unwrap();
    let marker = document.find(">Contents<").unwrap();
    assert!(heading < field && field < marker);
    assert!(read_text(&bytes, "word/settings.xml").contains("updateFields"));
}

#[test]
fn image_is_embedded_with_capped_extent() {
    let bytes = write_package(&kitchensink_model()).unwrap();
    let original = std::fs::read(fixtures_dir().join("wide.png")).unwrap();
    assert_eq!(read_part(&bytes, "word/media/image1.png"), original);

    let document = read_text(&bytes, "word/document.xml");
    let doc = roxmltree::Document::parse(&document).unwrap();
    let extent = doc
        .descendants()
        .find(|n| n.tag_name().name() == "extent")
        .expect("drawing extent");
    let cx: i64 = extent.attribute("cx").unwrap().parse().unwrap();
    let cy: i64 = extent.attribute("cy").unwrap().parse().unwrap();
    // 5.95in by 1.19in at 914400 EMU per inch, give or take rounding.
    assert!((cx - 5_440_680).abs() <= 1, "cx = {cx}");
    assert!((cy - 1_088_136).abs() <= 1, "cy = {cy}");

    let rels = read_text(&bytes, "word/_rels/document.xml.rels");
    assert!(rels.contains("Target=\"media/image1.png\""));
}

#[test]
fn publish_writes_docx_to_disk() {
    let model = kitchensink_model();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kitchensink.docx");

    let artifact = publish(PublishSpec::new(&model, "docx").with_output_path(&path)).unwrap();

    assert!(matches!(artifact, PublishArtifact::File(ref written) if written == &path));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
    let core = read_text(&bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>Apollo Handbook</dc:title>"));
}

#[test]
fn json_format_describes_the_model() {
    let model = kitchensink_model();
    let artifact = publish(PublishSpec::new(&model, "json")).unwrap();
    let PublishArtifact::InMemory(json) = artifact else {
        panic!("json should stay in memory");
    };
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let blocks = value["blocks"].as_array().unwrap();
    assert_eq!(blocks[0]["type"], "heading");
    assert_eq!(blocks[0]["text"], "Apollo Handbook");
    assert!(blocks.iter().any(|b| b["type"] == "table_of_contents"));
}
