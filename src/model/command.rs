//! Shell commands run by the agent.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A shell command and, once it arrives, its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BashCommand {
    pub invocation_id: String,

    /// When the command was invoked, not when output arrived.
    pub timestamp: Timestamp,
    pub command: String,

    /// `None` until a matching update is seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl BashCommand {
    pub fn is_pending(&self) -> bool {
        self.output.is_none()
    }
}
