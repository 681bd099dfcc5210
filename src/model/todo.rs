//! Todo items: one entry of the agent's live task plan.

use serde::{Deserialize, Serialize};

/// One item of the most recent plan snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Derived from the content, so it stays stable across snapshots
    /// while the content is unchanged.
    pub key: String,
    pub content: String,
    pub status: TodoStatus,
    pub priority: Priority,

    /// Position within the snapshot. The authoritative sort key.
    pub order: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TodoStatus {
    /// Lenient parse. Unknown values are treated as not started.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-progress" | "in_progress" | "inprogress" | "active" => Self::InProgress,
            "completed" | "complete" | "done" => Self::Completed,
            _ => Self::Todo,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Lenient parse. Unknown values fall back to medium.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}
