//! Error types for claude-commit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the Claude Code agent session.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    NotInstalled,

    #[error("Failed to spawn Claude process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Claude CLI exited with {}: {stderr}",
             code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    ProcessFailed { code: Option<i32>, stderr: String },

    #[error("Claude emitted an unreadable event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AgentError {
    /// Captured stderr, for failures that carry any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            AgentError::ProcessFailed { stderr, .. } if !stderr.trim().is_empty() => {
                Some(stderr.as_str())
            }
            _ => None,
        }
    }
}

/// Errors from the commit-side actions.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("git commit exited with {}: {stderr}",
             code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    CommitFailed { code: Option<i32>, stderr: String },

    #[error("Failed to run git: {0}")]
    GitSpawnFailed(#[source] std::io::Error),

    #[error("Failed to read confirmation: {0}")]
    PromptFailed(String),
}

/// Errors from writing to the system clipboard.
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard copy not supported on this platform ({0})")]
    Unsupported(&'static str),

    #[error("Failed to copy to clipboard: {0}")]
    Failed(String),
}

/// Errors from locating the repository to analyze.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Not a git repository: {}", path.display())]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Bare repositories have no working tree to analyze")]
    BareRepository,
}
