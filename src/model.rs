//! Core data model for scanboard.
//!
//! Inputs are what the scanning agent emitted (log entries, tool payloads)
//! and what the audit layer discovered (issues). Outputs are the derived,
//! render-ready views: todo items and timeline items.

mod command;
mod issue;
mod log;
mod timeline;
mod todo;

pub use command::BashCommand;
pub use issue::{
    Issue, RemediationStatus, Session, SessionKind, SessionStatus, Severity, VerificationStatus,
};
pub use log::{EntryKind, Level, LogEntry, ToolInput, ToolPayload};
pub use timeline::TimelineItem;
pub use todo::{Priority, TodoItem, TodoStatus};
