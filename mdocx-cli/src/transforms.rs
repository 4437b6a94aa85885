//! Inspectable pipeline stages
//!
//! `mdocx inspect <project> <stage>` runs the pipeline up to one stage and
//! prints what that stage produced, without writing a docx:
//!
//! 1. `macros`: the macro table after token resolution, one `key = value` per line.
//! 2. `markdown`: the body after macro, token and command substitution.
//! 3. `html`: the markdown converted to HTML.
//! 4. `model-json`: the rendered document model as JSON.
//!
//! Commands in the document are executed for every stage, macros included,
//! since the preprocessor always runs all of its passes.

use mdocx_babel::error::{ConvertError, FormatError};
use mdocx_babel::{
    convert_source, markup, publish, ConvertOptions, Preprocessor, Project, PublishArtifact,
    PublishSpec,
};

/// All stages `inspect` can print.
pub const AVAILABLE_STAGES: &[&str] = &["macros", "markdown", "html", "model-json"];

/// One-line description of every stage, for `--list-stages`.
pub fn describe_stage(stage: &str) -> &'static str {
    match stage {
        "macros" => "Macro table with tokens resolved",
        "markdown" => "Body after macro, token and command substitution",
        "html" => "HTML produced from the markdown",
        "model-json" => "Rendered document model as JSON",
        _ => "",
    }
}

/// Run `project` through the pipeline and return the output of `stage`.
pub fn execute_stage(
    project: &Project,
    stage: &str,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    let source = project.read_source()?;
    let name = project.source_name();

    match stage {
        "macros" => {
            let preprocessed = Preprocessor::new(&options.preprocess).run(&source, &name)?;
            Ok(preprocessed
                .macros
                .iter()
                .map(|entry| format!("{} = {}\n", entry.key, entry.value))
                .collect())
        }
        "markdown" => {
            let preprocessed = Preprocessor::new(&options.preprocess).run(&source, &name)?;
            Ok(preprocessed.markdown())
        }
        "html" => {
            let preprocessed = Preprocessor::new(&options.preprocess).run(&source, &name)?;
            Ok(markup::to_html(&preprocessed.markdown()))
        }
        "model-json" => {
            let mut options = options.clone();
            options.render.base_dir = project.base_dir();
            let conversion = convert_source(&source, &name, &options)?;
            match publish(PublishSpec::new(&conversion.model, "json"))? {
                PublishArtifact::InMemory(mut json) => {
                    json.push('\n');
                    Ok(json)
                }
                PublishArtifact::File(path) => Err(FormatError::NotSupported(format!(
                    "model written to {} instead of memory",
                    path.display()
                ))
                .into()),
            }
        }
        other => Err(FormatError::NotSupported(format!("unknown stage '{other}'")).into()),
    }
}
