use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::Read;
use tempfile::tempdir;

const DOC: &str = "\
<!--
MaCrOs
{'__name__': 'Apollo'}
END_MaCrOs
-->

# __name__ status

## Contents

Contents

Built on ${echo Tuesday}.
";

fn document_xml(docx: &std::path::Path) -> String {
    let file = fs::File::open(docx).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut part = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn bare_project_name_converts_to_docx() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("status.md"), DOC).unwrap();

    let mut cmd = cargo_bin_cmd!("mdocx");
    cmd.current_dir(dir.path()).arg("status");
    cmd.assert().success();

    let xml = document_xml(&dir.path().join("status.docx"));
    assert!(xml.contains("Apollo status"));
    assert!(xml.contains("Built on Tuesday."));
    assert!(xml.contains("TOC \\o"));
    assert!(!dir.path().join("status.html").exists());
}

#[test]
fn explicit_output_and_html_dump() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("status.md");
    fs::write(&input, DOC).unwrap();
    let output = dir.path().join("out").join("final.docx");
    fs::create_dir(dir.path().join("out")).unwrap();

    let mut cmd = cargo_bin_cmd!("mdocx");
    cmd.arg("convert")
        .arg(input.as_os_str())
        .arg("--html")
        .arg("-o")
        .arg(output.as_os_str());
    cmd.assert().success();

    assert!(output.exists());
    let html = fs::read_to_string(dir.path().join("status.html")).unwrap();
    assert!(html.contains("<h1>Apollo status</h1>"));
}

#[test]
fn json_output_path_dumps_the_model() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("status.md"), DOC).unwrap();

    let mut cmd = cargo_bin_cmd!("mdocx");
    cmd.current_dir(dir.path())
        .args(["convert", "status", "-o", "model.json"]);
    cmd.assert().success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("model.json")).unwrap())
            .unwrap();
    assert_eq!(json["blocks"][0]["text"], "Apollo status");
    assert!(!dir.path().join("status.docx").exists());
}

#[test]
fn toc_indicator_flag_changes_placement() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("status.md"), DOC).unwrap();

    let mut cmd = cargo_bin_cmd!("mdocx");
    cmd.current_dir(dir.path())
        .arg("status")
        .arg("--toc-indicator")
        .arg("no such words");
    cmd.assert().success();

    let xml = document_xml(&dir.path().join("status.docx"));
    assert!(!xml.contains("TOC \\o"));
}

#[test]
fn missing_input_exits_with_enoent() {
    let dir = tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("mdocx");
    cmd.current_dir(dir.path()).arg("absent");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("absent.md"));
}

#[cfg(unix)]
#[test]
fn directory_input_exits_with_eisdir() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("folder.md")).unwrap();

    let mut cmd = cargo_bin_cmd!("mdocx");
    cmd.current_dir(dir.path()).arg("folder");
    cmd.assert().code(21);
}

#[test]
fn malformed_macro_exits_with_failure() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("bad.md"),
        "MaCrOs\n{'__a__' 'no colon'}\nEND_MaCrOs\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("mdocx");
    cmd.current_dir(dir.path()).arg("bad");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Syntax error in bad.md on line 2"));
    assert!(!dir.path().join("bad.docx").exists());
}
