//! Shared configuration loader for the mdocx toolchain.
//!
//! `defaults/mdocx.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdocxConfig`],
//! which converts into the option structs `mdocx-babel` takes.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mdocx_babel::preprocess::PreprocessOptions;
use mdocx_babel::render::{MissingImagePolicy, RenderOptions};
use mdocx_babel::style::{
    CodeBlockStyle, Font, ListStyleTable, ParagraphStyle, Spacing, StyleConfig,
};
use mdocx_babel::ConvertOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/mdocx.default.toml");

/// Name of the per-directory configuration file picked up automatically.
pub const LOCAL_CONFIG_FILE: &str = "mdocx.toml";

/// Top-level configuration consumed by mdocx applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdocxConfig {
    pub preprocess: PreprocessConfig,
    pub render: RenderConfig,
    pub styles: StylesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessConfig {
    pub macro_start: String,
    pub macro_end: String,
    pub fence: String,
    #[serde(default)]
    pub command_timeout_ms: Option<u64>,
}

impl From<&PreprocessConfig> for PreprocessOptions {
    fn from(config: &PreprocessConfig) -> Self {
        PreprocessOptions {
            macro_start: config.macro_start.clone(),
            macro_end: config.macro_end.clone(),
            fence: config.fence.clone(),
            command_timeout: config.command_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub page_width_inches: f64,
    pub picture_fraction: f64,
    pub assumed_ppi: f64,
    pub toc_indicator: String,
    pub rule_length: usize,
    pub rule_char: char,
    pub on_missing_image: MissingImageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MissingImageConfig {
    #[serde(rename = "skip")]
    Skip,
    #[serde(rename = "fail")]
    Fail,
}

impl From<MissingImageConfig> for MissingImagePolicy {
    fn from(config: MissingImageConfig) -> Self {
        match config {
            MissingImageConfig::Skip => MissingImagePolicy::Skip,
            MissingImageConfig::Fail => MissingImagePolicy::Fail,
        }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        RenderOptions {
            page_width_inches: config.page_width_inches,
            picture_fraction: config.picture_fraction,
            assumed_ppi: config.assumed_ppi,
            toc_indicator: config.toc_indicator.clone(),
            rule_length: config.rule_length,
            rule_char: config.rule_char,
            on_missing_image: config.on_missing_image.into(),
            // Set per project; the input's directory is not known here.
            base_dir: PathBuf::from("."),
        }
    }
}

/// Named styles and their character and paragraph formatting.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesConfig {
    pub body: ParagraphStyleConfig,
    pub heading: ParagraphStyleConfig,
    pub blockquote: ParagraphStyleConfig,
    pub strong: ParagraphStyleConfig,
    pub code: CodeStyleConfig,
    pub table: TableStyleConfig,
    pub lists: ListsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParagraphStyleConfig {
    pub name: String,
    #[serde(default)]
    pub based_on: Option<String>,
    pub font: String,
    pub size_pt: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub color: Option<String>,
    pub space_before_pt: u32,
    pub space_after_pt: u32,
}

impl From<&ParagraphStyleConfig> for ParagraphStyle {
    fn from(config: &ParagraphStyleConfig) -> Self {
        let font = Font {
            family: config.font.clone(),
            size_pt: config.size_pt,
            bold: config.bold,
            italic: config.italic,
            color: config.color.clone(),
        };
        let style = ParagraphStyle::new(
            &config.name,
            font,
            Spacing::new(config.space_before_pt, config.space_after_pt),
        );
        match &config.based_on {
            Some(base) => style.based_on(base),
            None => style,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeStyleConfig {
    pub table_style: String,
    pub font: String,
    pub size_pt: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableStyleConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListsConfig {
    pub indent: String,
    pub unordered: ListTableConfig,
    pub ordered: ListTableConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListTableConfig {
    pub styles: Vec<String>,
    pub glyph: String,
}

impl ListsConfig {
    fn table(&self, config: &ListTableConfig, numbered: bool) -> ListStyleTable {
        ListStyleTable {
            styles: config.styles.clone(),
            glyph: config.glyph.clone(),
            indent: self.indent.clone(),
            numbered,
        }
    }
}

impl From<&StylesConfig> for StyleConfig {
    fn from(config: &StylesConfig) -> Self {
        StyleConfig {
            body: (&config.body).into(),
            heading: (&config.heading).into(),
            blockquote: (&config.blockquote).into(),
            strong: (&config.strong).into(),
            code: CodeBlockStyle {
                table_style: config.code.table_style.clone(),
                font: Font::new(&config.code.font, config.code.size_pt),
            },
            table: config.table.name.clone(),
            unordered: config.lists.table(&config.lists.unordered, false),
            ordered: config.lists.table(&config.lists.ordered, true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub write_html: bool,
}

impl From<&MdocxConfig> for ConvertOptions {
    fn from(config: &MdocxConfig) -> Self {
        ConvertOptions {
            preprocess: (&config.preprocess).into(),
            render: (&config.render).into(),
            styles: (&config.styles).into(),
            write_html: config.output.write_html,
        }
    }
}

impl From<MdocxConfig> for ConvertOptions {
    fn from(config: MdocxConfig) -> Self {
        (&config).into()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `mdocx.toml` from `dir` when it exists.
    pub fn with_local_file(self, dir: impl AsRef<Path>) -> Self {
        self.with_optional_file(dir.as_ref().join(LOCAL_CONFIG_FILE))
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdocxConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdocxConfig, ConfigError> {
    Loader::new().build()
}
