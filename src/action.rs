//! What to do with a generated message: preview, copy, commit or suggest.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use dialoguer::Input;
use tracing::debug;

use crate::clipboard;
use crate::config::RunConfig;
use crate::error::{ActionError, ClipboardError};
use crate::extract::shell_single_quote;
use crate::git;
use crate::reporter::Reporter;

const CONFIRM_PROMPT: &str = "❓ Commit with this message? [y/N]";

const RULE_WIDTH: usize = 60;

/// Result of dispatching a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The message was shown and nothing else happened.
    Previewed,
    /// The operator confirmed and git created the commit.
    Committed,
    /// The operator declined the confirmation.
    Cancelled,
    /// A ready-to-run `git commit` command was printed.
    Suggested(String),
}

/// Side effects the dispatcher may perform.
///
/// This abstraction allows replacing the clipboard, terminal prompt and git in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Effects {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), ClipboardError>;

    /// Ask the operator a question and return the raw answer.
    fn read_confirmation(&self, prompt: &str) -> Result<String, ActionError>;

    /// Create the commit and return git's stdout.
    fn commit(&self, message: &str) -> Result<String, ActionError>;
}

/// Effects against the real clipboard, terminal and repository.
pub struct SystemEffects {
    workdir: PathBuf,
}

impl SystemEffects {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

impl Effects for SystemEffects {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), ClipboardError> {
        clipboard::copy_to_clipboard(text)
    }

    fn read_confirmation(&self, prompt: &str) -> Result<String, ActionError> {
        if !io::stdin().is_terminal() {
            return read_answer(io::stdin().lock(), &mut io::stdout(), prompt);
        }

        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ActionError::PromptFailed(e.to_string()))
    }

    fn commit(&self, message: &str) -> Result<String, ActionError> {
        git::commit_with_message(&self.workdir, message)
    }
}

/// Prompt on `output` and read one answer line from `input`.
///
/// Used when stdin is not a terminal. Only the line terminator is removed,
/// and end of input reads as an empty answer.
pub fn read_answer<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    prompt: &str,
) -> Result<String, ActionError> {
    write!(output, "{}: ", prompt)
        .and_then(|_| output.flush())
        .map_err(|e| ActionError::PromptFailed(e.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| ActionError::PromptFailed(e.to_string()))?;

    let answer = line.strip_suffix('\n').unwrap_or(&line);
    let answer = answer.strip_suffix('\r').unwrap_or(answer);
    Ok(answer.to_string())
}

/// Only an exact `y` or `Y` confirms.
pub fn is_affirmative(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y")
}

/// The `git commit` command line for `message`, quoted for a POSIX shell.
pub fn suggested_command(message: &str) -> String {
    format!("git commit -m {}", shell_single_quote(message))
}

/// Show `message` and act on it according to the run flags.
///
/// Precedence: `preview` stops after showing the message; otherwise `copy`
/// runs first (failures only warn), then either the confirmed commit or the
/// printed suggestion.
pub fn dispatch<E: Effects + ?Sized>(
    message: &str,
    config: &RunConfig,
    effects: &E,
    reporter: &Reporter,
) -> Result<DispatchOutcome, ActionError> {
    show_message(message, reporter);

    if config.preview {
        reporter.info("\n✅ Preview complete (no action taken)");
        return Ok(DispatchOutcome::Previewed);
    }

    if config.copy {
        match effects.copy_to_clipboard(message) {
            Ok(()) => reporter.info("\n✅ Commit message copied to clipboard!"),
            Err(e) => reporter.warn(e.to_string()),
        }
    }

    if !config.commit {
        let command = suggested_command(message);
        reporter.info("\n💡 To commit with this message, run:");
        reporter.info(format!("   {}", command));
        reporter.info("\nOr use: claude-commit --commit");
        return Ok(DispatchOutcome::Suggested(command));
    }

    reporter.info("");
    let answer = effects.read_confirmation(CONFIRM_PROMPT)?;
    if !is_affirmative(&answer) {
        debug!("Confirmation answer {:?} declined", answer);
        reporter.info("❌ Commit cancelled");
        return Ok(DispatchOutcome::Cancelled);
    }

    let stdout = effects.commit(message)?;
    reporter.info("\n✅ Successfully committed!");
    if !stdout.trim().is_empty() {
        reporter.info(stdout.trim_end());
    }

    Ok(DispatchOutcome::Committed)
}

fn show_message(message: &str, reporter: &Reporter) {
    let rule = "=".repeat(RULE_WIDTH);
    reporter.info(format!("\n{}", rule));
    reporter.info("📝 Generated Commit Message:");
    reporter.info(&rule);
    reporter.info(message);
    reporter.info(&rule);
}
