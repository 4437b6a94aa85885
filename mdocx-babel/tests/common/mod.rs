//! Shared helpers for the integration tests.

use mdocx_babel::preprocess::CommandExecutor;
use std::path::PathBuf;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).expect("fixture to exist")
}

/// Understands `echo` and nothing else; records every call.
#[derive(Default)]
pub struct Echo {
    pub calls: Vec<String>,
}

impl CommandExecutor for Echo {
    fn execute(&mut self, argv: &[&str]) -> String {
        self.calls.push(argv.join(" "));
        match argv {
            ["echo", rest @ ..] => rest.join(" "),
            _ => String::new(),
        }
    }
}

/// The header of a PNG image; enough for size probing.
pub fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}
