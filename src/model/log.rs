//! Log entries: what the scanning agent emitted, as received.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single entry in the agent's activity log.
///
/// Immutable once received. Entries carry no sequence number: arrival index
/// orders them for correlation, `timestamp` orders them for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: Timestamp,

    #[serde(default)]
    pub level: Level,

    /// Free-text commentary, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Present only on tool traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_payload: Option<ToolPayload>,
}

impl LogEntry {
    /// A plain commentary entry.
    pub fn message(timestamp: Timestamp, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level,
            message: Some(message.into()),
            kind: None,
            tool_payload: None,
        }
    }

    /// A tool call as emitted by the agent.
    pub fn invocation(timestamp: Timestamp, payload: ToolPayload) -> Self {
        Self {
            timestamp,
            level: Level::Info,
            message: None,
            kind: Some(EntryKind::ToolInvocation),
            tool_payload: Some(payload),
        }
    }

    /// Later output for an earlier tool call.
    pub fn update(timestamp: Timestamp, payload: ToolPayload) -> Self {
        Self {
            timestamp,
            level: Level::Info,
            message: None,
            kind: Some(EntryKind::ToolUpdate),
            tool_payload: Some(payload),
        }
    }

    /// The commentary text, if present and not blank.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Info,
    Error,
    Success,
}

/// What kind of tool traffic an entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// The agent called a tool.
    ToolInvocation,

    /// A tool call produced (more) output.
    ToolUpdate,
}

/// The tool half of a log entry.
///
/// `invocation_id` is opaque and correlates an invocation with its later
/// updates. It is unique within one step's event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPayload {
    #[serde(default)]
    pub invocation_id: String,

    #[serde(default)]
    pub tool_name: String,

    /// When the tool itself reported emitting this. Kept for the record;
    /// ordering and display always use the owning `LogEntry::timestamp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emitted_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<ToolInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ToolPayload {
    pub fn new(invocation_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            tool_name: tool_name.into(),
            emitted_at: None,
            input: None,
            output: None,
        }
    }

    #[must_use]
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(ToolInput(input));
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Arguments a tool was called with.
///
/// Shape depends on the tool and on the agent's version, so it stays
/// untyped and is read through lenient accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolInput(pub Value);

impl ToolInput {
    /// The first of `names` that holds a string, in the order given.
    pub fn str_field(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .find_map(|name| self.0.get(*name).and_then(Value::as_str))
    }

    /// A list under `name`, or the input itself when it is a bare list.
    pub fn list_field(&self, name: &str) -> Option<&[Value]> {
        match &self.0 {
            Value::Array(items) => Some(items.as_slice()),
            other => other.get(name).and_then(Value::as_array).map(Vec::as_slice),
        }
    }
}
