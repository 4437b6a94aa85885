use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the stages from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_STAGES: &[&str] = &["macros", "markdown", "html", "model-json"];

fn project_arg() -> Arg {
    Arg::new("project")
        .help("Project name or path to its .md file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("mdocx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert annotated markdown into docx documents")
        .arg_required_else_help(true)
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
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("inspect").arg(project_arg()).arg(
                Arg::new("stage")
                    .help("Stage to print")
                    .required(true)
                    .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_STAGES))
                    .index(2)
                    .value_hint(ValueHint::Other),
            ),
        )
        .subcommand(
            Command::new("convert")
                .arg(project_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("html").long("html").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("toc-indicator")
                        .long("toc-indicator")
                        .value_hint(ValueHint::Other),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mdocx", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mdocx", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mdocx", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
