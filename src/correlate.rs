//! Command/output correlation.
//!
//! Shell commands and their output arrive as separate log entries tied
//! together by invocation id. Every call folds the full entry list into a
//! fresh ledger; nothing is carried between calls.

use std::collections::HashMap;

use tracing::debug;

use crate::classify::{Event, classify_all};
use crate::config::ToolNames;
use crate::model::{BashCommand, LogEntry, ToolPayload};

/// Input fields that may hold the command text, in order of preference.
const COMMAND_FIELDS: [&str; 2] = ["command", "cmd"];

/// Shell commands keyed by invocation id, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLedger {
    commands: Vec<BashCommand>,
    index: HashMap<String, usize>,
}

impl CommandLedger {
    pub fn get(&self, invocation_id: &str) -> Option<&BashCommand> {
        self.index.get(invocation_id).map(|&i| &self.commands[i])
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in the order their invocations arrived.
    pub fn iter(&self) -> impl Iterator<Item = &BashCommand> {
        self.commands.iter()
    }

    pub fn into_commands(self) -> Vec<BashCommand> {
        self.commands
    }

    /// Record a shell invocation. The first invocation for an id wins.
    fn invoke(&mut self, command: BashCommand) {
        if self.index.contains_key(&command.invocation_id) {
            debug!(
                event = "duplicate_invocation",
                invocation_id = %command.invocation_id,
            );
            return;
        }
        self.index
            .insert(command.invocation_id.clone(), self.commands.len());
        self.commands.push(command);
    }

    /// Attach output to a known command. Unknown ids are dropped.
    fn attach(&mut self, invocation_id: &str, output: Option<&str>) {
        let Some(&i) = self.index.get(invocation_id) else {
            debug!(event = "unmatched_update", invocation_id = %invocation_id);
            return;
        };
        if let Some(output) = output {
            self.commands[i].output = Some(output.to_string());
        }
    }
}

/// Fold `events` into a command ledger.
///
/// Updates never precede their invocation, so an update for an unseen id
/// is dropped rather than buffered.
pub fn reduce(events: &[LogEntry], tools: &ToolNames) -> CommandLedger {
    let mut ledger = CommandLedger::default();
    for event in classify_all(events) {
        match event {
            Event::Invocation { entry, payload } if payload.tool_name == tools.shell => {
                ledger.invoke(BashCommand {
                    invocation_id: payload.invocation_id.clone(),
                    timestamp: entry.timestamp,
                    command: command_text(payload).to_string(),
                    output: None,
                });
            }
            Event::Update { payload, .. } => {
                ledger.attach(&payload.invocation_id, payload.output.as_deref());
            }
            _ => {}
        }
    }
    ledger
}

/// The command text, or empty when neither accepted field holds one.
fn command_text(payload: &ToolPayload) -> &str {
    payload
        .input
        .as_ref()
        .and_then(|input| input.str_field(&COMMAND_FIELDS))
        .unwrap_or_default()
}
