//! Events emitted by a Claude Code session.
//!
//! The CLI is run with `--output-format stream-json`, which prints one JSON
//! object per line. Each line is decoded into zero or more [`AgentEvent`]s.

use serde::Deserialize;

use crate::error::AgentError;

/// Metadata carried by the terminal `result` line of a session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionSummary {
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
    #[serde(default)]
    pub duration_ms: f64,
    #[serde(default)]
    pub num_turns: u32,
}

/// A single event from the agent, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    AssistantText {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        is_error: bool,
    },
    Result(SessionSummary),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamLine {
    Assistant { message: StreamMessage },
    User { message: StreamMessage },
    Result(SessionSummary),
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct StreamMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: String,
        #[serde(default)]
        is_error: Option<bool>,
    },
    #[serde(other)]
    Other,
}

/// Decode one stream-json line into events.
///
/// Blank lines and line types with no counterpart (such as `system`) yield
/// no events. Text that is not valid JSON is an `InvalidEvent` error.
pub fn parse_stream_line(line: &str) -> Result<Vec<AgentEvent>, AgentError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let parsed: StreamLine = serde_json::from_str(line).map_err(|e| {
        let preview: String = line.chars().take(200).collect();
        AgentError::InvalidEvent(format!("{}. Line: {}", e, preview))
    })?;

    let events = match parsed {
        StreamLine::Assistant { message } => message
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(AgentEvent::AssistantText { text }),
                ContentBlock::ToolUse { id, name, input } => {
                    Some(AgentEvent::ToolUse { id, name, input })
                }
                _ => None,
            })
            .collect(),
        StreamLine::User { message } => message
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::ToolResult {
                    tool_use_id,
                    is_error,
                } => Some(AgentEvent::ToolResult {
                    tool_use_id,
                    is_error: is_error.unwrap_or(false),
                }),
                _ => None,
            })
            .collect(),
        StreamLine::Result(summary) => vec![AgentEvent::Result(summary)],
        StreamLine::Other => Vec::new(),
    };

    Ok(events)
}
