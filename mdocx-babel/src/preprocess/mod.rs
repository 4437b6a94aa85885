//! Text preprocessing: macros, tokens and inline commands
//!
//!     The preprocessor works on the raw markdown before it ever reaches the markdown library.
//!     It runs three passes over one mutable line sequence, always in this order:
//!
//!     1. Macro extraction (./macros.rs): the `MaCrOs` ... `END_MaCrOs` block is read into a
//!        [`MacroMap`] and its interior lines are dropped from the body.
//!     2. Token substitution (./tokens.rs): tokens inside macro values are resolved once, then
//!        every macro key found in a body line is replaced by its value.
//!     3. Command substitution (./commands.rs): every `${command args}` span is executed and
//!        replaced by the trimmed standard output of the command.
//!
//!     Commands run after tokens so that a token inside a command line is resolved before the
//!     command is executed. Running them the other way around would execute raw `__token__`
//!     text. [`Preprocessor::run`] is the only place that chains the passes.
//!
//!     Lines inside a fenced code region are carried through verbatim: they are never macro
//!     delimiters or entries, and neither tokens nor commands are expanded in them.
//!
//! Security
//!
//!     Command substitution executes whatever the document author wrote, with the privileges
//!     of the current user and without any sandbox. Only convert documents you trust.

pub mod commands;
pub mod literal;
pub mod macros;
pub mod tokens;

pub use commands::{CommandExecutor, CommandSubstitutor, CommandToken, ProcessExecutor};
pub use macros::{MacroEntry, MacroMap, MacroStore};
pub use tokens::TokenResolver;

use crate::error::PreprocessError;
use std::time::Duration;
use tracing::{debug, warn};

/// One line of the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupLine {
    pub text: String,
    /// Set for fence delimiters and everything between them.
    pub fenced: bool,
}

impl MarkupLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fenced: false,
        }
    }

    pub fn fenced(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fenced: true,
        }
    }
}

/// Knobs for the preprocessing passes.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOptions {
    pub macro_start: String,
    pub macro_end: String,
    pub fence: String,
    /// Upper bound for a single command. `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            macro_start: "MaCrOs".to_string(),
            macro_end: "END_MaCrOs".to_string(),
            fence: "```".to_string(),
            command_timeout: None,
        }
    }
}

/// Output of a full preprocessing run.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub macros: MacroMap,
    pub lines: Vec<MarkupLine>,
}

impl Preprocessed {
    /// The body as markdown text, ready for conversion.
    pub fn markdown(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

/// Chains the preprocessing passes in their fixed order.
pub struct Preprocessor<'a> {
    options: &'a PreprocessOptions,
}

impl<'a> Preprocessor<'a> {
    pub fn new(options: &'a PreprocessOptions) -> Self {
        Self { options }
    }

    /// Run all passes with the default process executor.
    pub fn run(&self, source: &str, source_name: &str) -> Result<Preprocessed, PreprocessError> {
        let mut executor = ProcessExecutor::new(self.options.command_timeout);
        self.run_with(source, source_name, &mut executor)
    }

    /// Run all passes, executing commands through `executor`.
    pub fn run_with(
        &self,
        source: &str,
        source_name: &str,
        executor: &mut dyn CommandExecutor,
    ) -> Result<Preprocessed, PreprocessError> {
        let store = MacroStore::new(self.options);
        let (mut macros, mut lines) = store.parse(source.lines(), source_name)?;
        debug!(
            macros = macros.len(),
            lines = lines.len(),
            "extracted macro block"
        );

        TokenResolver::resolve_macro_values(&mut macros, source_name)?;
        TokenResolver::substitute_in_text(&mut lines, &macros);
        for (index, line) in lines.iter().enumerate().filter(|(_, line)| !line.fenced) {
            let leftover = TokenResolver::unresolved_tokens(&line.text);
            if !leftover.is_empty() {
                warn!(body_line = index + 1, tokens = ?leftover, "tokens left unresolved");
            }
        }

        let executed = CommandSubstitutor::new(executor).substitute_commands(&mut lines);
        debug!(commands = executed, "substituted command output");

        Ok(Preprocessed { macros, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    struct Recorder(Vec<String>);

    impl CommandExecutor for Recorder {
        fn execute(&mut self, argv: &[&str]) -> String {
            self.0.push(argv.join(" "));
            format!("<{}>", argv.join(" "))
        }
    }

    #[test]
    fn tokens_resolve_before_commands_run() {
        let source = "\
<!--
MaCrOs
{'__who__': 'world'}
END_MaCrOs
-->
${echo __who__}
";
        let options = PreprocessOptions::default();
        let mut recorder = Recorder(Vec::new());
        let result = Preprocessor::new(&options)
            .run_with(source, "doc.md", &mut recorder)
            .unwrap();

        assert_eq!(recorder.0, vec!["echo world".to_string()]);
        assert_eq!(result.lines[4].text, "<echo world>");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn leftover_tokens_are_reported_as_warnings() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        let options = PreprocessOptions::default();
        let result = tracing::subscriber::with_default(subscriber, || {
            Preprocessor::new(&options).run_with(
                "Hello __nobody__\n",
                "doc.md",
                &mut Recorder(Vec::new()),
            )
        })
        .unwrap();

        assert_eq!(result.lines[0].text, "Hello __nobody__");
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("tokens left unresolved"), "{logs}");
        assert!(logs.contains("__nobody__"), "{logs}");
    }

    #[test]
    fn markdown_joins_lines_with_newlines() {
        let pre = Preprocessed {
            macros: MacroMap::default(),
            lines: vec![MarkupLine::new("# Title"), MarkupLine::new("body")],
        };
        assert_eq!(pre.markdown(), "# Title\nbody\n");
    }
}
