//! Timeline items: the merged, render-ready execution history.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{BashCommand, LogEntry};

/// One row of the execution timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimelineItem {
    /// A shell command, with output if it has arrived.
    Command {
        timestamp: Timestamp,
        payload: BashCommand,
    },

    /// Free-text commentary from the agent.
    Message {
        timestamp: Timestamp,
        payload: LogEntry,
    },
}

impl TimelineItem {
    pub fn command(command: BashCommand) -> Self {
        Self::Command {
            timestamp: command.timestamp,
            payload: command,
        }
    }

    pub fn message(entry: LogEntry) -> Self {
        Self::Message {
            timestamp: entry.timestamp,
            payload: entry,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Command { timestamp, .. } | Self::Message { timestamp, .. } => *timestamp,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command { .. })
    }
}
