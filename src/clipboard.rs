//! System clipboard access through the platform's command-line tool.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ClipboardError;

const PBCOPY_ARGS: &[&str] = &[];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];

/// Clipboard program and arguments for an OS family, if one is supported.
pub fn clipboard_command(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        "macos" => Some(("pbcopy", PBCOPY_ARGS)),
        "linux" => Some(("xclip", XCLIP_ARGS)),
        _ => None,
    }
}

/// Copy `text` to the clipboard of the current platform.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let os = std::env::consts::OS;
    let (program, args) = clipboard_command(os).ok_or(ClipboardError::Unsupported(os))?;
    pipe_to(program, args, text)
}

/// Run `program` and write `text` to its stdin.
fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ClipboardError::Failed(format!("could not run {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| ClipboardError::Failed(format!("could not write to {}: {}", program, e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| ClipboardError::Failed(format!("{} did not finish: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipboardError::Failed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
