//! Claude Code agent integration.

pub mod driver;
pub mod event;
pub mod prompt;
pub mod session;

pub use driver::{SessionTranscript, generate_commit_message, run_session};
pub use event::{AgentEvent, SessionSummary, parse_stream_line};
pub use prompt::{COMMIT_MESSAGE_MARKER, SYSTEM_PROMPT, build_task_prompt};
pub use session::{AgentSession, ClaudeCliSession, EventStream};
