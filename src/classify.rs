//! Event classification: what a raw log entry means for the derived views.
//!
//! Pure function of one entry. Nothing here fails: an entry that is neither
//! recognizable tool traffic nor commentary simply has no classification.

use crate::model::{EntryKind, LogEntry, ToolPayload};

/// A log entry, tagged by how the derived views consume it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// Free-text commentary.
    Message(&'a LogEntry),

    /// The agent called a tool.
    Invocation {
        entry: &'a LogEntry,
        payload: &'a ToolPayload,
    },

    /// Output for an earlier invocation with the same id.
    ///
    /// Whether that invocation exists is for the consumer to decide.
    Update {
        entry: &'a LogEntry,
        payload: &'a ToolPayload,
    },
}

/// Classify one entry.
///
/// Tool traffic needs both the matching `kind` and a usable payload: a named
/// tool for invocations, an invocation id for updates. Anything else with a
/// non-blank message is commentary. The rest is dropped.
pub fn classify(entry: &LogEntry) -> Option<Event<'_>> {
    match (entry.kind, entry.tool_payload.as_ref()) {
        (Some(EntryKind::ToolInvocation), Some(payload)) if !payload.tool_name.is_empty() => {
            return Some(Event::Invocation { entry, payload });
        }
        (Some(EntryKind::ToolUpdate), Some(payload)) if !payload.invocation_id.is_empty() => {
            return Some(Event::Update { entry, payload });
        }
        _ => {}
    }

    entry.text().map(|_| Event::Message(entry))
}

/// Classify every entry, in arrival order, skipping the unclassifiable.
pub fn classify_all(entries: &[LogEntry]) -> impl Iterator<Item = Event<'_>> {
    entries.iter().filter_map(classify)
}
