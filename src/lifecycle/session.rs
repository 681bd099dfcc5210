//! Session ledgers: the append-only history of reproduction and remediation attempts.

use jiff::Timestamp;

use crate::executor::ExecutorError;
use crate::model::{Issue, Session, SessionKind, SessionStatus};

/// Append a session to the matching ledger. Existing sessions are untouched.
pub fn record_session(mut issue: Issue, kind: SessionKind, session: Session) -> Issue {
    match kind {
        SessionKind::Reproduction => issue.reproduction_sessions.push(session),
        SessionKind::Remediation => issue.remediation_sessions.push(session),
    }
    issue
}

/// The session recording how an external attempt settled.
///
/// Every settled attempt gets a fresh session id; retries never reuse one.
pub fn settled(
    session_type: &str,
    outcome: &Result<(), ExecutorError>,
    at: Timestamp,
) -> Session {
    match outcome {
        Ok(()) => Session::new(session_type, SessionStatus::Completed, at),
        Err(e) => Session::new(session_type, SessionStatus::Failed, at).with_notes(e.to_string()),
    }
}
