//! Session driver: runs the analysis conversation and collects its output.

use tracing::debug;

use crate::agent::event::{AgentEvent, SessionSummary};
use crate::agent::prompt::{SYSTEM_PROMPT, build_task_prompt};
use crate::agent::session::AgentSession;
use crate::config::{RunConfig, SessionConfig};
use crate::error::AgentError;
use crate::extract::extract_commit_message;
use crate::reporter::Reporter;
use crate::spinner::Spinner;

/// Everything the driver collected from one finished session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTranscript {
    /// Trimmed assistant text blocks in arrival order.
    pub texts: Vec<String>,
    /// Metadata from the terminal `result` event, if one arrived.
    pub summary: Option<SessionSummary>,
}

impl SessionTranscript {
    /// Whether the session ended with a successful `result` event.
    pub fn succeeded(&self) -> bool {
        self.summary.as_ref().is_some_and(|s| !s.is_error)
    }

    /// The commit message, once the session has completed successfully.
    pub fn commit_message(&self) -> Option<String> {
        if !self.succeeded() {
            return None;
        }
        extract_commit_message(&self.texts)
    }
}

/// Run one session to completion, consuming every event in order.
pub async fn run_session<A: AgentSession + ?Sized>(
    agent: &A,
    prompt: &str,
    config: &SessionConfig,
    reporter: &Reporter,
) -> Result<SessionTranscript, AgentError> {
    let mut stream = agent.open(prompt, config).await?;
    let mut transcript = SessionTranscript::default();

    while let Some(event) = stream.next().await {
        match event? {
            AgentEvent::AssistantText { text } => {
                let text = text.trim().to_string();
                if !text.is_empty() {
                    reporter.detail(format!("💭 {}", text));
                }
                transcript.texts.push(text);
            }
            AgentEvent::ToolUse { name, input, .. } => {
                debug!("Tool use: {} {}", name, input);
                reporter.detail(format!("🔧 {}", name));
            }
            AgentEvent::ToolResult {
                tool_use_id,
                is_error,
            } => {
                debug!("Tool result for {} (error={})", tool_use_id, is_error);
            }
            AgentEvent::Result(summary) => {
                report_summary(&summary, reporter);
                transcript.summary = Some(summary);
            }
        }
    }

    Ok(transcript)
}

fn report_summary(summary: &SessionSummary, reporter: &Reporter) {
    if let Some(cost) = summary.total_cost_usd.filter(|c| *c > 0.0) {
        reporter.detail(format!("💰 Cost: ${:.4}", cost));
    }
    reporter.detail(format!("⏱️  Duration: {:.2}s", summary.duration_ms / 1000.0));
    reporter.detail(format!("🔄 Turns: {}", summary.num_turns));
    if summary.is_error {
        debug!("Session ended with is_error=true");
    }
}

/// Generate a commit message for the repository in `config`.
///
/// Agent failures are reported through `reporter` and collapse into `None`.
/// The spinner, if given, runs only while the session is in flight.
pub async fn generate_commit_message<A: AgentSession + ?Sized>(
    agent: &A,
    config: &RunConfig,
    reporter: &Reporter,
    spinner: Option<&mut Spinner>,
) -> Option<String> {
    let workdir = &config.repository_path;

    reporter.detail(format!("🔍 Analyzing repository: {}", workdir.display()));
    reporter.detail(format!(
        "📝 Mode: {}",
        if config.staged_only {
            "staged changes only"
        } else {
            "all changes"
        }
    ));
    debug!("max_diff_lines={} (advisory)", config.max_diff_lines);

    let prompt = build_task_prompt(workdir, config.staged_only);
    let session_config = SessionConfig::new(SYSTEM_PROMPT, workdir.clone());

    reporter.detail("🤖 Claude is analyzing your changes...");

    let result = match spinner {
        Some(spinner) => {
            spinner.start();
            let result = run_session(agent, &prompt, &session_config, reporter).await;
            spinner.stop();
            result
        }
        None => run_session(agent, &prompt, &session_config, reporter).await,
    };

    match result {
        Ok(transcript) => transcript.commit_message(),
        Err(e) => {
            report_agent_error(&e, reporter);
            None
        }
    }
}

fn report_agent_error(err: &AgentError, reporter: &Reporter) {
    match err {
        AgentError::NotInstalled => {
            reporter.error("Error: Claude Code CLI not found.");
            reporter
                .error_detail("📦 Please install it: npm install -g @anthropic-ai/claude-code");
        }
        AgentError::ProcessFailed { .. } => {
            reporter.error(format!("Process error: {}", err));
            if let Some(stderr) = err.stderr() {
                reporter.error_detail(format!("stderr: {}", stderr.trim_end()));
            }
        }
        _ => {
            reporter.error(format!("Unexpected error: {}", err));
            if reporter.is_verbose() {
                reporter.error_detail(format!("{:?}", err));
            }
        }
    }
}
