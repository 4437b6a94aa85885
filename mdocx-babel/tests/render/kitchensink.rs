use crate::common::{fixture, fixtures_dir, png_header, Echo};
use insta::assert_snapshot;
use mdocx_babel::docx::Block;
use mdocx_babel::error::RenderError;
use mdocx_babel::{convert_source_with, ConvertError, ConvertOptions, DocumentModel};
use mdocx_babel::render::MissingImagePolicy;
use std::fmt::Write;

fn options() -> ConvertOptions {
    let mut options = ConvertOptions::default();
    options.render.base_dir = fixtures_dir();
    options
}

fn render_kitchensink(options: &ConvertOptions) -> DocumentModel {
    convert_source_with(
        &fixture("kitchensink.md"),
        "kitchensink.md",
        options,
        &mut Echo::default(),
    )
    .expect("conversion")
    .model
}

/// One line per block, enough to see order, kind and style at a glance.
fn outline(model: &DocumentModel) -> String {
    let mut out = String::new();
    for block in &model.blocks {
        let _ = match block {
            Block::Heading { text, level, .. } => writeln!(out, "heading({level}) {text}"),
            Block::Paragraph(p) => {
                let style = p.style.as_deref().map(|s| format!("[{s}]")).unwrap_or_default();
                let bold = if p.bold { "+bold" } else { "" };
                writeln!(out, "paragraph{style}{bold} {}", p.text)
            }
            Block::ListItem { text, style, depth } => {
                let style = style.as_deref().map(|s| format!("[{s}]")).unwrap_or_default();
                writeln!(out, "item{style}@{depth} {}", text.trim_start())
            }
            Block::Table(table) => writeln!(
                out,
                "table[{}] {}x{}",
                table.style,
                table.rows.len(),
                table.columns()
            ),
            Block::Image(image) => writeln!(
                out,
                "image {:.2}x{:.2}",
                image.width_inches, image.height_inches
            ),
            Block::Rule { .. } => writeln!(out, "rule"),
            Block::TableOfContents { .. } => writeln!(out, "toc"),
        };
    }
    out
}

#[test]
fn kitchensink_outline() {
    let model = render_kitchensink(&options());
    assert_snapshot!(outline(&model), @r###"
    heading(0) Apollo Handbook
    paragraph[Body Text] Maintained by Flight Ops. Built on Tuesday.
    heading(1) Table of Contents
    toc
    paragraph[Body Text] Contents
    heading(1) Overview
    paragraph[Body Text]+bold Plain paragraph with strong words.
    paragraph[Body Text] A paragraph with emphasis in it.
    paragraph[Custom Quote] Quoted guidance from Flight Ops.
    rule
    table[Medium Shading 1 Accent 3] 3x2
    item[List Number]@0 First step
    item[List Number]@0 Second step
    item[List Bullet]@0 level one
    item[List Bullet 2]@1 level two
    item[List Bullet 3]@2 level three
    item@3 ○  level four
    table[Table Grid] 1x1
    image 5.95x1.19
    "###);
}

#[test]
fn table_cells_carry_substituted_text() {
    let model = render_kitchensink(&options());
    let table = model
        .blocks
        .iter()
        .find_map(|block| match block {
            Block::Table(table) if table.header_row => Some(table),
            _ => None,
        })
        .expect("data table");
    assert_eq!(
        table.rows,
        vec![
            vec!["Field".to_string(), "Value".to_string()],
            vec!["name".to_string(), "Apollo".to_string()],
            vec!["stage".to_string(), "ready".to_string()],
        ]
    );
}

#[test]
fn fenced_code_keeps_raw_tokens() {
    let model = render_kitchensink(&options());
    let code = model
        .blocks
        .iter()
        .find_map(|block| match block {
            Block::Table(table) if !table.header_row => Some(table),
            _ => None,
        })
        .expect("code table");
    assert_eq!(code.rows[0][0], "raw __project__ and ${echo untouched}");
}

#[test]
fn deep_list_item_uses_fallback_indentation() {
    let model = render_kitchensink(&options());
    let fallback = model
        .blocks
        .iter()
        .find_map(|block| match block {
            Block::ListItem {
                text, style: None, ..
            } => Some(text.clone()),
            _ => None,
        })
        .expect("fallback item");
    let expected = format!("{}{}○  level four", " ".repeat(8), " ".repeat(12));
    assert_eq!(fallback, expected);
}

#[test]
fn image_width_is_capped_by_page_fraction() {
    let options = options();
    let model = render_kitchensink(&options);
    let image = model.images().next().expect("image");
    let cap = options.render.page_width_inches * options.render.picture_fraction;
    assert!((image.width_inches - cap).abs() < 1e-9);
    assert!((image.width_inches / image.height_inches - 5.0).abs() < 1e-9);
    assert_eq!(image.extension, "png");
}

#[test]
fn small_image_keeps_natural_size() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("small.png"), png_header(300, 150)).unwrap();
    let mut options = ConvertOptions::default();
    options.render.base_dir = dir.path().to_path_buf();

    let model = convert_source_with("![s](small.png)\n", "s.md", &options, &mut Echo::default())
        .unwrap()
        .model;
    let image = model.images().next().expect("image");
    assert!((image.width_inches - 1.5).abs() < 1e-9);
    assert!((image.height_inches - 0.75).abs() < 1e-9);
}

#[test]
fn missing_image_fails_under_strict_policy() {
    let mut options = options();
    options.render.on_missing_image = MissingImagePolicy::Fail;
    let err = convert_source_with(
        "![gone](nowhere.png)\n",
        "gone.md",
        &options,
        &mut Echo::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Render(RenderError::Image { ref path, .. }) if path.ends_with("nowhere.png")
    ));
}

#[test]
fn no_indicator_means_no_contents_field() {
    let mut options = options();
    options.render.toc_indicator = String::new();
    let model = render_kitchensink(&options);
    assert!(!model
        .blocks
        .iter()
        .any(|block| matches!(block, Block::TableOfContents { .. })));
}
