//! Inline command substitution
//!
//! `${command arg1 arg2}` is replaced by the standard output of running
//! `command` with the given arguments. The braces' content is split on
//! whitespace; there is no shell, no quoting and no globbing.
//!
//! Failures never surface: a command that exits non-zero contributes whatever
//! it printed to stdout, and one that cannot be started contributes nothing.
//! Stderr is discarded.

use super::MarkupLine;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::ops::Range;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

static COMMAND_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output is still collected after a timed command has ended.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// One `${...}` occurrence inside a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken {
    /// The text between the braces.
    pub command: String,
    /// Byte range of the whole `${...}` span.
    pub span: Range<usize>,
}

impl CommandToken {
    /// All command tokens in `line`, left to right.
    pub fn scan(line: &str) -> Vec<CommandToken> {
        COMMAND_PATTERN
            .captures_iter(line)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let inner = caps.get(1)?;
                Some(CommandToken {
                    command: inner.as_str().to_string(),
                    span: whole.range(),
                })
            })
            .collect()
    }

    pub fn argv(&self) -> Vec<&str> {
        self.command.split_whitespace().collect()
    }
}

/// Runs one command line and returns its trimmed output.
pub trait CommandExecutor {
    fn execute(&mut self, argv: &[&str]) -> String;
}

/// Executes commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn spawn(program: &str, args: &[&str]) -> std::io::Result<Child> {
        let resolved = which::which(program).unwrap_or_else(|_| PathBuf::from(program));
        Command::new(resolved)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
    }

    /// Wait for `child` at most `timeout`, killing it on expiry.
    ///
    /// Stdout is read on a helper thread that streams chunks back. Once the child is gone the
    /// remaining output is drained for at most [`DRAIN_GRACE`]; a process the child left
    /// behind may keep the pipe open, in which case the reader is left detached.
    fn collect(mut child: Child, timeout: Duration, program: &str) -> String {
        let Some(mut stdout) = child.stdout.take() else {
            return String::new();
        };
        let (sender, chunks) = mpsc::channel::<Vec<u8>>();
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(read) => {
                        if sender.send(buf[..read].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let mut output = Vec::new();
        let deadline = Instant::now() + timeout;
        loop {
            output.extend(chunks.try_iter().flatten());
            match child.try_wait() {
                Ok(Some(status)) => {
                    if !status.success() {
                        debug!(%program, %status, "command exited unsuccessfully");
                    }
                    break;
                }
                Ok(None) if Instant::now() >= deadline => {
                    warn!(%program, ?timeout, "command timed out, killing it");
                    Self::reap(&mut child);
                    break;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    warn!(%program, %err, "failed to wait for command");
                    Self::reap(&mut child);
                    break;
                }
            }
        }

        let drain_until = Instant::now() + DRAIN_GRACE;
        loop {
            let left = drain_until.saturating_duration_since(Instant::now());
            match chunks.recv_timeout(left) {
                Ok(chunk) => output.extend(chunk),
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    debug!(%program, "output pipe still open, leaving reader behind");
                    break;
                }
            }
        }
        String::from_utf8_lossy(&output).trim().to_string()
    }

    fn reap(child: &mut Child) {
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&mut self, argv: &[&str]) -> String {
        let Some((program, args)) = argv.split_first() else {
            warn!("empty command token");
            return String::new();
        };

        let child = match Self::spawn(program, args) {
            Ok(child) => child,
            Err(err) => {
                warn!(%program, %err, "failed to start command");
                return String::new();
            }
        };

        if let Some(timeout) = self.timeout {
            return Self::collect(child, timeout, program);
        }

        match child.wait_with_output() {
            Ok(output) => {
                if !output.status.success() {
                    debug!(%program, status = %output.status, "command exited unsuccessfully");
                }
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Err(err) => {
                warn!(%program, %err, "failed to collect command output");
                String::new()
            }
        }
    }
}

/// Splices command output into lines.
pub struct CommandSubstitutor<'e> {
    executor: &'e mut dyn CommandExecutor,
}

impl<'e> CommandSubstitutor<'e> {
    pub fn new(executor: &'e mut dyn CommandExecutor) -> Self {
        Self { executor }
    }

    /// Substitute every command token in every non-fenced line.
    ///
    /// Returns the number of commands executed.
    pub fn substitute_commands(&mut self, lines: &mut [MarkupLine]) -> usize {
        let mut executed = 0;
        for line in lines.iter_mut().filter(|line| !line.fenced) {
            let tokens = CommandToken::scan(&line.text);
            if tokens.is_empty() {
                continue;
            }
            executed += tokens.len();
            line.text = self.substitute_line(&line.text, &tokens);
        }
        executed
    }

    fn substitute_line(&mut self, line: &str, tokens: &[CommandToken]) -> String {
        let mut out = String::with_capacity(line.len());
        let mut cursor = 0;
        for token in tokens {
            out.push_str(&line[cursor..token.span.start]);
            debug!(command = %token.command, "executing command");
            let output = self.executor.execute(&token.argv());
            out.push_str(&output);
            cursor = token.span.end;
        }
        out.push_str(&line[cursor..]);
        out
    }
}
