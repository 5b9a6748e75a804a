//! claude-commit - A CLI tool that generates git commit messages with Claude Code.
//!
//! # Overview
//!
//! claude-commit lets the Claude Code CLI investigate the repository's changes
//! with a small read-only toolset, extracts the commit message it settles on,
//! and then previews it, copies it, commits with it, or prints the command.

pub mod action;
pub mod agent;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod extract;
pub mod git;
pub mod reporter;
pub mod spinner;

// Re-export commonly used types
pub use action::{DispatchOutcome, Effects, SystemEffects, dispatch};
pub use agent::{AgentEvent, AgentSession, ClaudeCliSession, EventStream, SessionSummary};
pub use config::{PermissionMode, RunConfig, SessionConfig};
pub use error::{ActionError, AgentError, ClipboardError, RepoError};
pub use extract::{extract_commit_message, strip_markdown_fences};
pub use reporter::Reporter;
pub use spinner::Spinner;
