//! The verification and remediation state machines.
//!
//! Both tables are total: every `(status, action)` pair has a successor.
//! Pairs with no edge leave the status as it is.

use jiff::Timestamp;
use tracing::{debug, info};

use crate::model::{Issue, RemediationStatus, VerificationStatus};

/// Something that moves an issue along the verification axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationAction {
    /// A reproduction attempt was dispatched.
    StartReproduction,

    /// The reproduction attempt came back, whatever the outcome.
    SettleReproduction,

    /// A reviewer's explicit decision.
    Review(Verdict),
}

/// The reviewer decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Confirmed,
    Dismissed,
    NeedsInfo,
}

impl From<Verdict> for VerificationStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Confirmed => Self::Confirmed,
            Verdict::Dismissed => Self::Dismissed,
            Verdict::NeedsInfo => Self::NeedsInfo,
        }
    }
}

/// Something that moves an issue along the remediation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationAction {
    /// A remediation attempt was dispatched. Also "re-apply" and "retry".
    Start,

    /// The remediation attempt came back.
    Settle { succeeded: bool },

    /// An external check confirmed an applied fix.
    MarkVerified,
}

/// Who acted, when, and what they had to say.
///
/// Timestamps are passed in rather than read from the clock, so
/// transitions stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub at: Timestamp,
    pub reviewer: Option<String>,
    pub notes: Option<String>,
}

impl Review {
    pub fn new(at: Timestamp) -> Self {
        Self {
            at,
            reviewer: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn by(mut self, reviewer: impl Into<String>) -> Self {
        self.reviewer = Some(reviewer.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

pub fn next_verification_status(
    current: VerificationStatus,
    action: VerificationAction,
) -> VerificationStatus {
    use VerificationStatus::{Pending, Reproducing};

    match (current, action) {
        (_, VerificationAction::StartReproduction) => Reproducing,
        (Reproducing, VerificationAction::SettleReproduction) => Pending,
        (other, VerificationAction::SettleReproduction) => other,
        (_, VerificationAction::Review(verdict)) => verdict.into(),
    }
}

/// `None` is "never attempted".
pub fn next_remediation_status(
    current: Option<RemediationStatus>,
    action: RemediationAction,
) -> Option<RemediationStatus> {
    use RemediationStatus::{Applied, Failed, InProgress, NotStarted, Verified};

    let next = match (current, action) {
        (None | Some(NotStarted | Failed | Applied | InProgress), RemediationAction::Start) => {
            InProgress
        }
        (Some(InProgress), RemediationAction::Settle { succeeded: true }) => Applied,
        (Some(InProgress), RemediationAction::Settle { succeeded: false }) => Failed,
        (Some(Applied | Verified), RemediationAction::MarkVerified) => Verified,
        (current, _) => return current,
    };
    Some(next)
}

/// Apply a verification action.
///
/// Reviewer decisions overwrite the stored notes when notes are given, and
/// entering `confirmed` stamps who confirmed it and when.
pub fn verify(mut issue: Issue, action: VerificationAction, review: &Review) -> Issue {
    let from = issue.verification_status;
    let to = next_verification_status(from, action);

    if let VerificationAction::Review(verdict) = action {
        if let Some(notes) = &review.notes {
            issue.reviewer_notes = Some(notes.clone());
        }
        if verdict == Verdict::Confirmed {
            issue.confirmed_at = Some(review.at);
            issue.confirmed_by.clone_from(&review.reviewer);
        }
    }

    log_transition(&issue.id, "verification", from.as_str(), to.as_str());
    issue.verification_status = to;
    issue
}

/// Apply a remediation action. Entering `applied` stamps who and when.
pub fn remediate(mut issue: Issue, action: RemediationAction, review: &Review) -> Issue {
    let from = issue.remediation_status;
    let to = next_remediation_status(from, action);

    if from != to && to == Some(RemediationStatus::Applied) {
        issue.remediated_at = Some(review.at);
        issue.remediated_by.clone_from(&review.reviewer);
    }

    log_transition(
        &issue.id,
        "remediation",
        from.map_or("absent", RemediationStatus::as_str),
        to.map_or("absent", RemediationStatus::as_str),
    );
    issue.remediation_status = to;
    issue
}

/// Move an issue to a requested verification status.
///
/// `reproducing` starts a reproduction, `pending` settles one, and the
/// three reviewer statuses are reviewer decisions.
pub fn apply_verification_transition(
    issue: Issue,
    status: VerificationStatus,
    review: &Review,
) -> Issue {
    let action = match status {
        VerificationStatus::Reproducing => VerificationAction::StartReproduction,
        VerificationStatus::Pending => VerificationAction::SettleReproduction,
        VerificationStatus::Confirmed => VerificationAction::Review(Verdict::Confirmed),
        VerificationStatus::Dismissed => VerificationAction::Review(Verdict::Dismissed),
        VerificationStatus::NeedsInfo => VerificationAction::Review(Verdict::NeedsInfo),
    };
    verify(issue, action, review)
}

/// Move an issue to a requested remediation status.
///
/// `not_started` only fills in an absent status; it never rolls back.
pub fn apply_remediation_transition(
    mut issue: Issue,
    status: RemediationStatus,
    review: &Review,
) -> Issue {
    let action = match status {
        RemediationStatus::InProgress => RemediationAction::Start,
        RemediationStatus::Applied => RemediationAction::Settle { succeeded: true },
        RemediationStatus::Failed => RemediationAction::Settle { succeeded: false },
        RemediationStatus::Verified => RemediationAction::MarkVerified,
        RemediationStatus::NotStarted => {
            if issue.remediation_status.is_none() {
                issue.remediation_status = Some(RemediationStatus::NotStarted);
            }
            return issue;
        }
    };
    remediate(issue, action, review)
}

fn log_transition(issue_id: &str, axis: &str, from: &str, to: &str) {
    if from == to {
        debug!(event = "transition_noop", issue_id, axis, status = from);
    } else {
        info!(event = "transition", issue_id, axis, from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::Severity;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(secs).unwrap()
    }

    fn issue() -> Issue {
        Issue::new("i-1", "Weak TLS ciphers", Severity::Medium)
    }

    const VERIFICATION_ACTIONS: [VerificationAction; 5] = [
        VerificationAction::StartReproduction,
        VerificationAction::SettleReproduction,
        VerificationAction::Review(Verdict::Confirmed),
        VerificationAction::Review(Verdict::Dismissed),
        VerificationAction::Review(Verdict::NeedsInfo),
    ];

    const REMEDIATION_ACTIONS: [RemediationAction; 4] = [
        RemediationAction::Start,
        RemediationAction::Settle { succeeded: true },
        RemediationAction::Settle { succeeded: false },
        RemediationAction::MarkVerified,
    ];

    #[test]
    fn verification_table_is_total() {
        for status in VerificationStatus::ALL {
            for action in VERIFICATION_ACTIONS {
                let next = next_verification_status(status, action);
                assert!(
                    VerificationStatus::ALL.contains(&next),
                    "{status:?} + {action:?}"
                );
            }
        }
    }

    #[test]
    fn verification_edges() {
        use VerificationStatus::{Confirmed, Dismissed, NeedsInfo, Pending, Reproducing};

        let cases = [
            (Pending, VerificationAction::StartReproduction, Reproducing),
            (Reproducing, VerificationAction::SettleReproduction, Pending),
            (Pending, VerificationAction::SettleReproduction, Pending),
            (Confirmed, VerificationAction::SettleReproduction, Confirmed),
            (
                Reproducing,
                VerificationAction::Review(Verdict::Confirmed),
                Confirmed,
            ),
            (
                Confirmed,
                VerificationAction::Review(Verdict::Dismissed),
                Dismissed,
            ),
            (
                Dismissed,
                VerificationAction::Review(Verdict::NeedsInfo),
                NeedsInfo,
            ),
            (
                NeedsInfo,
                VerificationAction::Review(Verdict::Confirmed),
                Confirmed,
            ),
        ];
        for (from, action, expected) in cases {
            assert_eq!(next_verification_status(from, action), expected, "{from:?} + {action:?}");
        }
    }

    #[test]
    fn remediation_table_is_total() {
        let currents = std::iter::once(None).chain(RemediationStatus::ALL.into_iter().map(Some));
        for current in currents {
            for action in REMEDIATION_ACTIONS {
                let next = next_remediation_status(current, action);
                if current.is_some() {
                    assert!(next.is_some(), "{current:?} + {action:?} lost its status");
                }
            }
        }
    }

    #[test]
    fn remediation_edges() {
        use RemediationStatus::{Applied, Failed, InProgress, Verified};

        let cases = [
            (None, RemediationAction::Start, Some(InProgress)),
            (Some(InProgress), RemediationAction::Settle { succeeded: true }, Some(Applied)),
            (Some(InProgress), RemediationAction::Settle { succeeded: false }, Some(Failed)),
            (Some(Applied), RemediationAction::Start, Some(InProgress)),
            (Some(Failed), RemediationAction::Start, Some(InProgress)),
            (Some(Applied), RemediationAction::MarkVerified, Some(Verified)),
            (Some(Failed), RemediationAction::MarkVerified, Some(Failed)),
            (Some(Verified), RemediationAction::Start, Some(Verified)),
            (None, RemediationAction::Settle { succeeded: true }, None),
            (Some(Applied), RemediationAction::Settle { succeeded: false }, Some(Applied)),
        ];
        for (from, action, expected) in cases {
            assert_eq!(next_remediation_status(from, action), expected, "{from:?} + {action:?}");
        }
    }

    #[test]
    fn confirming_stamps_reviewer_and_notes() {
        let review = Review::new(at(100)).by("dana").with_notes("reproduced by hand");
        let issue = apply_verification_transition(issue(), VerificationStatus::Confirmed, &review);

        assert_eq!(issue.verification_status, VerificationStatus::Confirmed);
        assert_eq!(issue.confirmed_at, Some(at(100)));
        assert_eq!(issue.confirmed_by.as_deref(), Some("dana"));
        assert_eq!(issue.reviewer_notes.as_deref(), Some("reproduced by hand"));
    }

    #[test]
    fn dismissing_keeps_notes_when_none_given() {
        let mut start = issue();
        start.reviewer_notes = Some("earlier".into());

        let issue = apply_verification_transition(
            start,
            VerificationStatus::Dismissed,
            &Review::new(at(1)),
        );
        assert_eq!(issue.verification_status, VerificationStatus::Dismissed);
        assert_eq!(issue.reviewer_notes.as_deref(), Some("earlier"));
        assert_eq!(issue.confirmed_at, None);
    }

    #[test]
    fn review_notes_overwrite_previous_notes() {
        let first = Review::new(at(1)).with_notes("first");
        let second = Review::new(at(2)).with_notes("second");

        let issue = apply_verification_transition(issue(), VerificationStatus::NeedsInfo, &first);
        let issue = apply_verification_transition(issue, VerificationStatus::NeedsInfo, &second);
        assert_eq!(issue.reviewer_notes.as_deref(), Some("second"));
    }

    #[test]
    fn settling_ignores_notes() {
        let mut start = issue();
        start.verification_status = VerificationStatus::Reproducing;

        let review = Review::new(at(1)).with_notes("ignored");
        let issue = verify(start, VerificationAction::SettleReproduction, &review);
        assert_eq!(issue.verification_status, VerificationStatus::Pending);
        assert_eq!(issue.reviewer_notes, None);
    }

    #[test]
    fn applying_stamps_remediator() {
        let review = Review::new(at(50)).by("ops");
        let issue = remediate(issue(), RemediationAction::Start, &review);
        assert_eq!(issue.remediated_at, None);

        let issue = remediate(issue, RemediationAction::Settle { succeeded: true }, &review);
        assert_eq!(issue.remediation_status, Some(RemediationStatus::Applied));
        assert_eq!(issue.remediated_at, Some(at(50)));
        assert_eq!(issue.remediated_by.as_deref(), Some("ops"));
    }

    #[test]
    fn requesting_not_started_only_fills_absent_status() {
        let review = Review::new(at(1));
        let fresh = apply_remediation_transition(issue(), RemediationStatus::NotStarted, &review);
        assert_eq!(fresh.remediation_status, Some(RemediationStatus::NotStarted));

        let mut applied = issue();
        applied.remediation_status = Some(RemediationStatus::Applied);
        let applied = apply_remediation_transition(applied, RemediationStatus::NotStarted, &review);
        assert_eq!(applied.remediation_status, Some(RemediationStatus::Applied));
    }

    #[test]
    fn verified_is_preserved() {
        let mut start = issue();
        start.remediation_status = Some(RemediationStatus::Verified);

        let review = Review::new(at(1));
        let issue = apply_remediation_transition(start, RemediationStatus::Failed, &review);
        assert_eq!(issue.remediation_status, Some(RemediationStatus::Verified));
    }
}
