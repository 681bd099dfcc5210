//! Scanboard: activity-log reconciliation for an autonomous scanning agent.
//!
//! Given the agent's log entries, in any order of arrival, scanboard derives
//! three consistent, render-ready views:
//!
//! - the live task plan ([`derive_todo_plan`]),
//! - the execution timeline of shell commands and commentary
//!   ([`derive_timeline`], [`filter_timeline`]),
//! - the per-issue verification/remediation ledger ([`lifecycle`]).
//!
//! Derivations are pure: they take the whole entry list and recompute from
//! scratch, so they can be rerun on every new entry.

pub mod classify;
pub mod config;
pub mod correlate;
pub mod executor;
pub mod identity;
pub mod lifecycle;
pub mod model;
pub mod plan;
pub mod source;
pub mod timeline;

pub use config::{Config, ToolNames};
pub use executor::{Executor, ExecutorError};
pub use lifecycle::{
    IssueTracker, Review, apply_remediation_transition, apply_verification_transition,
    record_session,
};

use model::{LogEntry, TimelineItem, TodoItem};

/// The current todo plan, using the default tool names.
pub fn derive_todo_plan(events: &[LogEntry]) -> Vec<TodoItem> {
    plan::reduce(events, &ToolNames::default())
}

/// The execution timeline, oldest first, using the default tool names.
pub fn derive_timeline(events: &[LogEntry]) -> Vec<TimelineItem> {
    timeline::derive(events, &ToolNames::default())
}

/// The timeline with or without commentary. See [`timeline::filter`].
pub fn filter_timeline(timeline: &[TimelineItem], show_context: bool) -> Vec<TimelineItem> {
    timeline::filter(timeline, show_context)
}
