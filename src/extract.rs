//! Commit message extraction from free-form agent output.

use crate::agent::prompt::COMMIT_MESSAGE_MARKER;

/// Openings that mark narration rather than a commit message.
const FILLER_PREFIXES: [&str; 6] = ["let me", "i'll", "i will", "now i", "first", "i can see"];

/// Extract the final commit message from the assistant's text blocks.
///
/// The blocks are joined with newlines. If the joined text contains
/// `COMMIT_MESSAGE:`, everything after its first occurrence is the
/// candidate. Otherwise the last block that is not narration is used.
/// The candidate is then stripped of fenced code blocks and blank lines.
///
/// Returns `None` when no candidate is found or nothing survives cleanup.
pub fn extract_commit_message<S: AsRef<str>>(texts: &[S]) -> Option<String> {
    let joined = texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    let candidate = match joined.split_once(COMMIT_MESSAGE_MARKER) {
        Some((_, after)) => after.trim().to_string(),
        None => last_non_filler(texts)?.to_string(),
    };

    let cleaned = strip_markdown_fences(&candidate);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Scan from the end for a non-empty block that doesn't open with filler.
fn last_non_filler<S: AsRef<str>>(texts: &[S]) -> Option<&str> {
    texts
        .iter()
        .rev()
        .map(|t| t.as_ref().trim())
        .find(|t| !t.is_empty() && !is_filler(t))
}

fn is_filler(text: &str) -> bool {
    let lower = text.to_lowercase();
    FILLER_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Drop fence lines, everything inside fences, and blank lines.
///
/// Surviving lines are right-trimmed and the result is trimmed.
pub fn strip_markdown_fences(text: &str) -> String {
    let mut in_fence = false;
    let mut kept = Vec::new();

    for line in text.lines() {
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && !line.trim().is_empty() {
            kept.push(line.trim_end());
        }
    }

    kept.join("\n").trim().to_string()
}

/// Quote `message` for a single-quoted POSIX shell argument.
pub fn shell_single_quote(message: &str) -> String {
    format!("'{}'", message.replace('\'', r"'\''"))
}
