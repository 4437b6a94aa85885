//! Annotated Markdown to word processing documents
//!
//!     This crate turns a Markdown file carrying macros, token references and inline commands into
//!     an Office Open XML (`.docx`) document.
//!
//!     This is a pure lib, that is, it powers mdocx-cli but is shell agnostic: nothing in here prints,
//!     reads environment variables or exits the process. Errors are values; the binary decides
//!     what they mean for the exit status.
//!
//! Architecture
//!
//!     The conversion is a straight pipeline, each step owning one module:
//!
//!     1. ./preprocess: macro block extraction, token substitution, command substitution.
//!     2. ./markup: Markdown → HTML with comrak, HTML → [`SemanticNode`] tree with html5ever.
//!     3. ./render: node tree → [`DocumentModel`], with list walking, table reconstruction and
//!        image sizing.
//!     4. ./docx and ./formats: the model written out as a docx package (or as JSON for debugging).
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── project.rs              # <name>.md / .html / .docx paths
//!     ├── preprocess              # macros, tokens, commands
//!     ├── markup                  # markdown and html parsing
//!     ├── render                  # DocumentRenderer, ListWalker, tables, images
//!     ├── style.rs                # StyleConfig
//!     ├── docx                    # DocumentModel and the OOXML writer
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats                 # docx and json formats
//!     └── publish.rs
//!
//! Testing
//!     tests
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! State
//!
//!     Every run builds its own options, style tables and walker state. Nothing is global, so
//!     converting several documents in one process cannot leak list styles or counters between them.

pub mod docx;
pub mod error;
pub mod format;
pub mod formats;
pub mod markup;
pub mod preprocess;
pub mod project;
pub mod publish;
pub mod registry;
pub mod render;
pub mod style;

pub use docx::DocumentModel;
pub use error::{ConvertError, FormatError, MarkupError, PreprocessError, RenderError};
pub use format::{Format, SerializedDocument};
pub use markup::SemanticNode;
pub use preprocess::{CommandExecutor, PreprocessOptions, Preprocessed, Preprocessor};
pub use project::Project;
pub use publish::{publish, PublishArtifact, PublishSpec};
pub use registry::FormatRegistry;
pub use render::{DocumentRenderer, MissingImagePolicy, RenderOptions};
pub use style::StyleConfig;

use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything a single conversion needs.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub preprocess: PreprocessOptions,
    pub render: RenderOptions,
    pub styles: StyleConfig,
    /// Also write the intermediate HTML next to the output.
    pub write_html: bool,
}

/// Intermediate and final products of one conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub preprocessed: Preprocessed,
    pub html: String,
    pub model: DocumentModel,
}

/// Run the whole pipeline on in-memory text, executing commands as processes.
pub fn convert_source(
    source: &str,
    source_name: &str,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let mut executor = preprocess::ProcessExecutor::new(options.preprocess.command_timeout);
    convert_source_with(source, source_name, options, &mut executor)
}

/// Like [`convert_source`], with commands going through `executor`.
pub fn convert_source_with(
    source: &str,
    source_name: &str,
    options: &ConvertOptions,
    executor: &mut dyn CommandExecutor,
) -> Result<Conversion, ConvertError> {
    let preprocessed =
        Preprocessor::new(&options.preprocess).run_with(source, source_name, executor)?;
    let html = markup::to_html(&preprocessed.markdown());
    debug!(bytes = html.len(), "converted markdown to html");
    let nodes = markup::parse_fragment(&html)?;
    let model = DocumentRenderer::new(&options.render, &options.styles).render(&nodes)?;
    Ok(Conversion {
        preprocessed,
        html,
        model,
    })
}

/// Convert a project on disk and write its output. Returns the output path.
///
/// The format follows the output path's extension (`.json` dumps the model);
/// anything unrecognized is written as docx.
pub fn convert_project(
    project: &Project,
    options: &ConvertOptions,
) -> Result<PathBuf, ConvertError> {
    let source = project.read_source()?;
    info!(input = %project.input.display(), "converting");

    let mut options = options.clone();
    options.render.base_dir = project.base_dir();
    let conversion = convert_source(&source, &project.source_name(), &options)?;

    if options.write_html {
        fs::write(&project.html, &conversion.html).map_err(|source| FormatError::Write {
            path: project.html.clone(),
            source,
        })?;
        info!(path = %project.html.display(), "wrote html");
    }

    let format = FormatRegistry::with_defaults()
        .detect_format_from_filename(&project.output.to_string_lossy())
        .unwrap_or_else(|| "docx".to_string());
    debug!(%format, "selected output format");
    publish(PublishSpec::new(&conversion.model, &format).with_output_path(&project.output))?;
    Ok(project.output.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoCommands;

    impl CommandExecutor for NoCommands {
        fn execute(&mut self, _argv: &[&str]) -> String {
            String::new()
        }
    }

    #[test]
    fn macro_block_does_not_reach_the_document() {
        let source = "\
<!--
MaCrOs
{'__name__': 'Apollo'}
END_MaCrOs
-->

# __name__ plan
";
        let conversion =
            convert_source_with(source, "plan.md", &ConvertOptions::default(), &mut NoCommands)
                .unwrap();
        assert!(!conversion.html.contains("__name__"));
        assert!(conversion.html.contains("END_MaCrOs"));
        assert_eq!(conversion.model.blocks.len(), 1);
        assert!(matches!(
            &conversion.model.blocks[0],
            docx::Block::Heading { text, .. } if text == "Apollo plan"
        ));
    }

    #[test]
    fn output_extension_picks_the_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plan.md");
        fs::write(&input, "# Plan\n").unwrap();

        let project = Project::from_arg(input.to_str().unwrap())
            .with_output(dir.path().join("plan.json"));
        let written = convert_project(&project, &ConvertOptions::default()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(json["blocks"][0]["type"], "heading");

        let project = Project::from_arg(input.to_str().unwrap())
            .with_output(dir.path().join("plan.out"));
        let written = convert_project(&project, &ConvertOptions::default()).unwrap();
        assert_eq!(&fs::read(written).unwrap()[..2], b"PK");
    }

    #[test]
    fn preprocess_errors_surface_as_convert_errors() {
        let source = "MaCrOs\nnot a mapping\nEND_MaCrOs\n";
        let err = convert_source_with(source, "bad.md", &ConvertOptions::default(), &mut NoCommands)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Preprocess(_)));
        assert_eq!(err.exit_code(), error::EXIT_FAILURE);
    }
}
