//! Run and session configuration.

use std::env;
use std::fmt;
use std::path::PathBuf;

use tracing::warn;

/// Default turn budget for one agent session.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Default advisory diff size passed through from the CLI.
pub const DEFAULT_MAX_DIFF_LINES: usize = 500;

/// Default program name of the Claude Code CLI.
pub const DEFAULT_CLAUDE_BIN: &str = "claude";

/// Environment variable to override the turn budget.
const MAX_TURNS_ENV_VAR: &str = "CLAUDE_COMMIT_MAX_TURNS";

/// Environment variable to override the Claude Code program.
const CLAUDE_BIN_ENV_VAR: &str = "CLAUDE_COMMIT_CLAUDE_BIN";

/// Tools the agent may use while investigating changes.
pub const ALLOWED_TOOLS: [&str; 4] = ["Bash", "Read", "Grep", "Glob"];

/// Configuration derived from CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub repository_path: PathBuf,
    pub staged_only: bool,
    pub verbose: bool,
    pub max_diff_lines: usize,
    pub commit: bool,
    pub copy: bool,
    pub preview: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repository_path: PathBuf::from("."),
            staged_only: true,
            verbose: false,
            max_diff_lines: DEFAULT_MAX_DIFF_LINES,
            commit: false,
            copy: false,
            preview: false,
        }
    }
}

/// How the agent treats tool calls that would need approval.
///
/// Variants mirror the values `claude --permission-mode` accepts; sessions
/// opened by claude-commit always use `AcceptEdits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionMode {
    Default,
    #[default]
    AcceptEdits,
    Plan,
    BypassPermissions,
}

impl PermissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionMode::Default => "default",
            PermissionMode::AcceptEdits => "acceptEdits",
            PermissionMode::Plan => "plan",
            PermissionMode::BypassPermissions => "bypassPermissions",
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings handed to the agent when a session is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub system_prompt: String,
    pub allowed_tools: Vec<String>,
    pub permission_mode: PermissionMode,
    pub working_directory: PathBuf,
    pub max_turns: u32,
}

impl SessionConfig {
    /// Session settings for analyzing the repository at `working_directory`.
    pub fn new(system_prompt: impl Into<String>, working_directory: PathBuf) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            allowed_tools: ALLOWED_TOOLS.iter().map(|t| t.to_string()).collect(),
            permission_mode: PermissionMode::AcceptEdits,
            working_directory,
            max_turns: max_turns_from_env(),
        }
    }
}

/// Get the configured turn budget.
///
/// Reads from CLAUDE_COMMIT_MAX_TURNS if set, otherwise uses 10.
/// Zero, negative and non-numeric values log a warning and fall back to the default.
pub fn max_turns_from_env() -> u32 {
    match env::var(MAX_TURNS_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u32>() {
            Ok(turns) if turns > 0 => turns,
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}",
                    MAX_TURNS_ENV_VAR, v, DEFAULT_MAX_TURNS
                );
                DEFAULT_MAX_TURNS
            }
        },
        _ => DEFAULT_MAX_TURNS,
    }
}

/// Get the Claude Code program to run.
pub fn claude_bin_from_env() -> String {
    match env::var(CLAUDE_BIN_ENV_VAR) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => DEFAULT_CLAUDE_BIN.to_string(),
    }
}
