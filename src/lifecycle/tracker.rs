//! The issue tracker: shared issue state plus the async actions around the executor.
//!
//! The in-flight status is written before the executor is called and the
//! settled status only after it returns, so anyone reading mid-flight sees
//! `reproducing` / `in_progress`. The lock is never held across the call.
//!
//! The tracker does not stop a second start while one is in flight. Callers
//! disable the trigger while [`Issue::is_in_flight`] holds. A remediation
//! that cannot enter `in_progress` (a `verified` issue) is refused before
//! the executor is called.

use jiff::Timestamp;
use tokio::sync::RwLock;
use tracing::warn;

use crate::executor::Executor;
use crate::model::{Issue, RemediationStatus, SessionKind, VerificationStatus};

use super::session::{record_session, settled};
use super::transition::{
    RemediationAction, Review, VerificationAction, Verdict, apply_remediation_transition,
    next_remediation_status, remediate, verify,
};

/// Errors from tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("issue not found: {0}")]
    IssueNotFound(String),

    #[error("issue {id} cannot start remediation from {status}")]
    NotStartable { id: String, status: &'static str },
}

pub type Result<T> = core::result::Result<T, TrackerError>;

/// In-memory issue list driven by user actions and an executor.
pub struct IssueTracker<E> {
    issues: RwLock<Vec<Issue>>,
    executor: E,
    actor: Option<String>,
}

impl<E: Executor> IssueTracker<E> {
    pub fn new(issues: Vec<Issue>, executor: E) -> Self {
        Self {
            issues: RwLock::new(issues),
            executor,
            actor: None,
        }
    }

    /// Stamp executor-driven transitions with this identity.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub async fn get(&self, issue_id: &str) -> Option<Issue> {
        self.issues
            .read()
            .await
            .iter()
            .find(|i| i.id == issue_id)
            .cloned()
    }

    /// A snapshot of every issue.
    pub async fn issues(&self) -> Vec<Issue> {
        self.issues.read().await.clone()
    }

    /// Record a reviewer decision.
    pub async fn review(&self, issue_id: &str, verdict: Verdict, review: &Review) -> Result<Issue> {
        self.update(issue_id, |issue| {
            verify(issue, VerificationAction::Review(verdict), review)
        })
        .await
    }

    /// Set the remediation status directly, e.g. after an external verification.
    pub async fn set_remediation(
        &self,
        issue_id: &str,
        status: RemediationStatus,
        review: &Review,
    ) -> Result<Issue> {
        self.update(issue_id, |issue| {
            apply_remediation_transition(issue, status, review)
        })
        .await
    }

    /// Run a reproduction attempt.
    ///
    /// The issue is `reproducing` while the executor runs and back to
    /// `pending` afterwards, success or failure, with one new session.
    pub async fn start_reproduction(&self, issue_id: &str, session_type: &str) -> Result<Issue> {
        let started = self
            .update(issue_id, |issue| {
                if issue.verification_status == VerificationStatus::Reproducing {
                    warn!(event = "reproduction_already_running", issue_id = %issue.id);
                }
                verify(issue, VerificationAction::StartReproduction, &self.stamp())
            })
            .await?;

        let outcome = self
            .executor
            .start_reproduction(&started.id, session_type)
            .await;
        if let Err(e) = &outcome {
            warn!(event = "reproduction_failed", issue_id = %started.id, error = %e);
        }

        let session = settled(session_type, &outcome, Timestamp::now());
        self.update(issue_id, |issue| {
            let issue = verify(issue, VerificationAction::SettleReproduction, &self.stamp());
            record_session(issue, SessionKind::Reproduction, session)
        })
        .await
    }

    /// Run a remediation attempt.
    ///
    /// The issue is `in_progress` while the executor runs, then `applied` or
    /// `failed`, with one new session. Fails with
    /// [`TrackerError::NotStartable`] if the issue cannot enter `in_progress`;
    /// the executor is not called and nothing is recorded.
    pub async fn start_remediation(&self, issue_id: &str, session_type: &str) -> Result<Issue> {
        let started = self
            .try_update(issue_id, |issue| {
                let current = issue.remediation_status;
                if next_remediation_status(current, RemediationAction::Start)
                    != Some(RemediationStatus::InProgress)
                {
                    return Err(TrackerError::NotStartable {
                        id: issue.id,
                        status: current.map_or("none", RemediationStatus::as_str),
                    });
                }
                if current == Some(RemediationStatus::InProgress) {
                    warn!(event = "remediation_already_running", issue_id = %issue.id);
                }
                Ok(remediate(issue, RemediationAction::Start, &self.stamp()))
            })
            .await?;

        let outcome = self
            .executor
            .start_remediation(&started.id, session_type)
            .await;
        if let Err(e) = &outcome {
            warn!(event = "remediation_failed", issue_id = %started.id, error = %e);
        }

        let succeeded = outcome.is_ok();
        let session = settled(session_type, &outcome, Timestamp::now());
        self.update(issue_id, |issue| {
            let issue = remediate(issue, RemediationAction::Settle { succeeded }, &self.stamp());
            record_session(issue, SessionKind::Remediation, session)
        })
        .await
    }

    fn stamp(&self) -> Review {
        let review = Review::new(Timestamp::now());
        match &self.actor {
            Some(actor) => review.by(actor.clone()),
            None => review,
        }
    }

    /// Replace one issue with `f` applied to it, under the write lock.
    async fn update(&self, issue_id: &str, f: impl FnOnce(Issue) -> Issue) -> Result<Issue> {
        self.try_update(issue_id, |issue| Ok(f(issue))).await
    }

    /// Like `update`, but `f` may refuse. A refusal leaves the issue as it was.
    async fn try_update(
        &self,
        issue_id: &str,
        f: impl FnOnce(Issue) -> Result<Issue>,
    ) -> Result<Issue> {
        let mut issues = self.issues.write().await;
        let slot = issues
            .iter_mut()
            .find(|i| i.id == issue_id)
            .ok_or_else(|| TrackerError::IssueNotFound(issue_id.to_string()))?;
        *slot = f(slot.clone())?;
        Ok(slot.clone())
    }
}
