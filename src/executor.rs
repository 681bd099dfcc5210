//! The external automation backend that runs reproductions and remediations.
//!
//! Scanboard never runs these itself. It only moves the issue's status
//! around the call.

use async_trait::async_trait;

/// Errors an executor can report. Caught at the lifecycle boundary and
/// turned into a settled status, never propagated to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutorError {
    #[error("executor rejected the request: {0}")]
    Rejected(String),

    #[error("executor unavailable: {0}")]
    Unavailable(String),
}

/// Runs reproduction and remediation attempts against a target.
///
/// There is no cancellation and no timeout here: once called, a method is
/// expected to return. Timeouts are the implementation's business.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Try to reproduce the issue.
    async fn start_reproduction(&self, issue_id: &str, session_type: &str)
    -> Result<(), ExecutorError>;

    /// Try to apply a fix for the issue.
    async fn start_remediation(&self, issue_id: &str, session_type: &str)
    -> Result<(), ExecutorError>;
}
