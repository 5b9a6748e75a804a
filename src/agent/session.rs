//! Claude Code CLI spawning and event streaming.

use std::process::Stdio;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::debug;

use crate::agent::event::{AgentEvent, parse_stream_line};
use crate::config::{SessionConfig, claude_bin_from_env};
use crate::error::AgentError;

/// Capacity of the channel between the reader task and the driver.
const EVENT_BUFFER: usize = 64;

/// Ordered stream of events from one agent session.
///
/// The stream ends when the agent process has exited. A failure is
/// delivered as the final `Err` item.
pub struct EventStream {
    rx: mpsc::Receiver<Result<AgentEvent, AgentError>>,
}

impl EventStream {
    /// Create a stream and the sender that feeds it.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Result<AgentEvent, AgentError>>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }

    /// A finished stream that yields `items` in order.
    pub fn from_items(items: Vec<Result<AgentEvent, AgentError>>) -> Self {
        let (tx, stream) = Self::channel(items.len());
        for item in items {
            // Capacity equals the item count, so this cannot fill up.
            let _ = tx.try_send(item);
        }
        stream
    }

    /// A finished stream that yields only events.
    pub fn from_events(events: Vec<AgentEvent>) -> Self {
        Self::from_items(events.into_iter().map(Ok).collect())
    }

    /// Wait for the next event. Returns `None` once the session has ended.
    pub async fn next(&mut self) -> Option<Result<AgentEvent, AgentError>> {
        self.rx.recv().await
    }
}

/// Trait for opening a streaming session with the agent.
///
/// This abstraction allows replacing the Claude subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentSession: Send + Sync {
    /// Start a session for `prompt` and return its event stream.
    async fn open(&self, prompt: &str, config: &SessionConfig) -> Result<EventStream, AgentError>;
}

/// Session backed by the Claude Code CLI in stream-json mode.
pub struct ClaudeCliSession {
    program: String,
}

impl ClaudeCliSession {
    /// Session using the program from CLAUDE_COMMIT_CLAUDE_BIN, or `claude`.
    pub fn new() -> Self {
        Self::with_program(claude_bin_from_env())
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ClaudeCliSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Command-line arguments for one Claude Code invocation.
pub fn build_args(prompt: &str, config: &SessionConfig) -> Vec<String> {
    vec![
        "-p".to_string(),
        prompt.to_string(),
        "--output-format".to_string(),
        "stream-json".to_string(),
        // stream-json requires --verbose in print mode
        "--verbose".to_string(),
        "--system-prompt".to_string(),
        config.system_prompt.clone(),
        "--allowedTools".to_string(),
        config.allowed_tools.join(","),
        "--permission-mode".to_string(),
        config.permission_mode.as_str().to_string(),
        "--max-turns".to_string(),
        config.max_turns.to_string(),
    ]
}

#[async_trait]
impl AgentSession for ClaudeCliSession {
    async fn open(&self, prompt: &str, config: &SessionConfig) -> Result<EventStream, AgentError> {
        if which::which(&self.program).is_err() {
            return Err(AgentError::NotInstalled);
        }

        debug!(
            "Spawning {} in {} (max turns {})",
            self.program,
            config.working_directory.display(),
            config.max_turns
        );

        let mut child = Command::new(&self.program)
            .args(build_args(prompt, config))
            .current_dir(&config.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AgentError::NotInstalled,
                _ => AgentError::SpawnFailed(e),
            })?;

        let streams = child_streams(&mut child)?;
        let (tx, stream) = EventStream::channel(EVENT_BUFFER);
        tokio::spawn(pump_events(streams, child, tx));
        Ok(stream)
    }
}

struct ChildStreams {
    stdout: tokio::process::ChildStdout,
    stderr: tokio::process::ChildStderr,
}

fn child_streams(child: &mut Child) -> Result<ChildStreams, AgentError> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AgentError::Unexpected(anyhow!("Claude stdout was not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| AgentError::Unexpected(anyhow!("Claude stderr was not captured")))?;
    Ok(ChildStreams { stdout, stderr })
}

/// Forward decoded stdout lines to `tx`, then report the exit status.
async fn pump_events(
    streams: ChildStreams,
    mut child: Child,
    tx: mpsc::Sender<Result<AgentEvent, AgentError>>,
) {
    // Drain stderr concurrently so a chatty process cannot block on a full pipe.
    let stderr_task = tokio::spawn(read_to_string(streams.stderr));

    let mut lines = BufReader::new(streams.stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_stream_line(&line) {
                Ok(events) => {
                    for event in events {
                        if tx.send(Ok(event)).await.is_err() {
                            // Receiver gone; dropping the child kills it.
                            return;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            },
            Ok(None) => break,
            Err(e) => {
                let _ = tx
                    .send(Err(AgentError::Unexpected(
                        anyhow::Error::new(e).context("Failed to read Claude output"),
                    )))
                    .await;
                return;
            }
        }
    }

    let status = match child.wait().await {
        Ok(status) => status,
        Err(e) => {
            let _ = tx
                .send(Err(AgentError::Unexpected(
                    anyhow::Error::new(e).context("Failed to wait for Claude process"),
                )))
                .await;
            return;
        }
    };

    if !status.success() {
        let stderr = stderr_task.await.unwrap_or_default();
        let _ = tx
            .send(Err(AgentError::ProcessFailed {
                code: status.code(),
                stderr,
            }))
            .await;
    }
}

async fn read_to_string<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::event::SessionSummary;
    use std::path::PathBuf;

    fn config() -> SessionConfig {
        SessionConfig {
            system_prompt: "sys".to_string(),
            allowed_tools: vec!["Bash".into(), "Read".into(), "Grep".into(), "Glob".into()],
            permission_mode: Default::default(),
            working_directory: PathBuf::from("/repo"),
            max_turns: 7,
        }
    }

    #[test]
    fn test_build_args() {
        let args = build_args("analyze", &config());
        assert_eq!(
            args,
            vec![
                "-p",
                "analyze",
                "--output-format",
                "stream-json",
                "--verbose",
                "--system-prompt",
                "sys",
                "--allowedTools",
                "Bash,Read,Grep,Glob",
                "--permission-mode",
                "acceptEdits",
                "--max-turns",
                "7",
            ]
        );
    }

    #[tokio::test]
    async fn test_event_stream_from_items_preserves_order() {
        let mut stream = EventStream::from_items(vec![
            Ok(AgentEvent::AssistantText {
                text: "one".to_string(),
            }),
            Ok(AgentEvent::AssistantText {
                text: "two".to_string(),
            }),
            Err(AgentError::NotInstalled),
        ]);

        assert!(matches!(
            stream.next().await,
            Some(Ok(AgentEvent::AssistantText { text })) if text == "one"
        ));
        assert!(matches!(
            stream.next().await,
            Some(Ok(AgentEvent::AssistantText { text })) if text == "two"
        ));
        assert!(matches!(stream.next().await, Some(Err(AgentError::NotInstalled))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_event_stream_ends_immediately() {
        let mut stream = EventStream::from_events(Vec::new());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_program_is_not_installed() {
        let session = ClaudeCliSession::with_program("claude_commit_nonexistent_12345");
        let result = session.open("prompt", &config()).await;
        assert!(matches!(result, Err(AgentError::NotInstalled)));
    }

    #[tokio::test]
    async fn test_mock_session_returns_scripted_events() {
        let mut mock = MockAgentSession::new();
        mock.expect_open().times(1).returning(|_, _| {
            Ok(EventStream::from_events(vec![AgentEvent::Result(
                SessionSummary {
                    is_error: false,
                    total_cost_usd: None,
                    duration_ms: 1.0,
                    num_turns: 1,
                },
            )]))
        });

        let mut stream = mock.open("p", &config()).await.unwrap();
        assert!(matches!(stream.next().await, Some(Ok(AgentEvent::Result(_)))));
    }
}
