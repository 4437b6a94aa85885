// Command-line interface for mdocx
//
// This binary turns annotated markdown projects into docx documents, and can print the
// intermediate products of the pipeline for debugging.
//
// A project is named by its base path: `mdocx report` (or `mdocx report.md`) reads
// `report.md` and writes `report.docx`, plus `report.html` when asked for.
//
// Usage:
//  mdocx <project> [-o <file>] [--html] [--toc-indicator <text>]          - Convert (default)
//  mdocx convert <project> [-o <file>] [--html] [--toc-indicator <text>]  - Same as above (explicit)
//  mdocx inspect <project> <stage>                                         - Print one pipeline stage
//  mdocx --list-stages                                                     - List available stages
//
// Configuration:
//
// The embedded defaults are layered with `mdocx.toml` from the working directory and then with
// the file given by --config. Single keys can be overridden with --extra-<key> <value>, where
// <key> is the dotted path of the setting, e.g. `--extra-render.picture_fraction 0.5`.
//
// Exit status:
//
// 2 when the input does not exist, 13 when it cannot be read, 21 when it is a directory,
// 1 for every other failure.

mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use mdocx_babel::error::EXIT_FAILURE;
use mdocx_babel::{convert_project, ConvertOptions, Project};
use mdocx_config::{Loader, MdocxConfig};
use std::collections::HashMap;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key {
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn project_arg() -> Arg {
    Arg::new("project")
        .help("Project name or path to its .md file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("mdocx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert annotated markdown into docx documents")
        .long_about(
            "mdocx converts a markdown file carrying macros, tokens and inline commands into \
            a Word document.\n\n\
            Commands:\n  \
            - convert: Write <project>.docx (default command)\n  \
            - inspect: Print one stage of the pipeline\n\n\
            Extra Parameters:\n  \
            Use --extra-<key> [value] to override a single configuration key.\n  \
            Boolean keys can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            mdocx report                           # report.md -> report.docx\n  \
            mdocx report.md -o out/final.docx      # Choose the output path\n  \
            mdocx report -o model.json             # Dump the rendered model\n  \
            mdocx report --html                    # Also write report.html\n  \
            mdocx inspect report markdown          # Show the preprocessed markdown\n  \
            mdocx report --extra-render.on_missing_image fail",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-stages")
                .long("list-stages")
                .help("List the stages `inspect` can print")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mdocx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (-v for progress, -vv for debugging)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print one stage of the conversion pipeline")
                .long_about(
                    "Run the pipeline up to one stage and print its output.\n\n\
                    Stages:\n  \
                    - macros:     Macro table with tokens resolved\n  \
                    - markdown:   Body after macro, token and command substitution\n  \
                    - html:       HTML produced from the markdown\n  \
                    - model-json: Rendered document model as JSON\n\n\
                    Inline commands are executed for every stage.",
                )
                .arg(project_arg())
                .arg(
                    Arg::new("stage")
                        .help("Stage to print")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_STAGES,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a project to docx (default command)")
                .long_about(
                    "Convert <project>.md into <project>.docx.\n\n\
                    Macros, tokens and inline commands are expanded first. Inline commands run \
                    with your privileges and without a sandbox: only convert documents you trust.\n\n\
                    Examples:\n  \
                    mdocx convert report                   # report.md -> report.docx\n  \
                    mdocx report                           # 'convert' is optional",
                )
                .arg(project_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Output file path (defaults to <project>.docx; a .json path dumps the model)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help("Also write the intermediate HTML to <project>.html")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("toc-indicator")
                        .long("toc-indicator")
                        .value_name("TEXT")
                        .help("Text whose second occurrence places the table of contents")
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare project name means "convert"
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !matches!(cleaned_args[1].as_str(), "inspect" | "convert" | "help")
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_count("verbose"));

    if matches.get_flag("list-stages") {
        handle_list_stages_command();
        return;
    }

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &extra_params,
    );
    let options = ConvertOptions::from(&config);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => handle_inspect_command(sub_matches, &options),
        Some(("convert", sub_matches)) => handle_convert_command(sub_matches, options),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flags.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn handle_inspect_command(sub_matches: &ArgMatches, options: &ConvertOptions) {
    let project = Project::from_arg(
        sub_matches
            .get_one::<String>("project")
            .expect("project is required"),
    );
    let stage = sub_matches
        .get_one::<String>("stage")
        .expect("stage is required");

    match transforms::execute_stage(&project, stage, options) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn handle_convert_command(sub_matches: &ArgMatches, mut options: ConvertOptions) {
    let mut project = Project::from_arg(
        sub_matches
            .get_one::<String>("project")
            .expect("project is required"),
    );
    if let Some(output) = sub_matches.get_one::<String>("output") {
        project = project.with_output(output);
    }
    if sub_matches.get_flag("html") {
        options.write_html = true;
    }
    if let Some(indicator) = sub_matches.get_one::<String>("toc-indicator") {
        options.render.toc_indicator = indicator.clone();
    }
    debug!(?project, "resolved project paths");

    match convert_project(&project, &options) {
        Ok(path) => info!(path = %path.display(), "wrote output"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn handle_list_stages_command() {
    println!("Available stages:\n");
    for stage in transforms::AVAILABLE_STAGES {
        println!("  {stage:<12}{}", transforms::describe_stage(stage));
    }
}

fn load_cli_config(explicit_path: Option<&str>, overrides: &HashMap<String, String>) -> MdocxConfig {
    let loader = Loader::new().with_local_file(".");
    let mut loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    let mut keys: Vec<_> = overrides.keys().collect();
    keys.sort();
    for key in keys {
        loader = loader
            .set_override(key, overrides[key].as_str())
            .unwrap_or_else(|err| {
                eprintln!("Invalid override --extra-{key}: {err}");
                std::process::exit(EXIT_FAILURE);
            });
    }

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(EXIT_FAILURE);
    })
}
