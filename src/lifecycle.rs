//! Issue lifecycle: verification and remediation of discovered vulnerabilities.
//!
//! Two independent axes per issue:
//!
//! ```text
//! verification:  pending ──start──▶ reproducing ──settle──▶ pending
//!                any ──review──▶ confirmed | dismissed | needs_info
//!
//! remediation:   absent | not_started | failed | applied ──start──▶ in_progress
//!                in_progress ──settle──▶ applied | failed
//!                applied ──external check──▶ verified
//! ```
//!
//! The transitions are pure functions of `(issue, action)`. The
//! [`IssueTracker`] adds shared state and the async executor calls.

mod session;
mod tracker;
mod transition;

pub use session::{record_session, settled};
pub use tracker::{IssueTracker, TrackerError};
pub use transition::{
    RemediationAction, Review, VerificationAction, Verdict, apply_remediation_transition,
    apply_verification_transition, next_remediation_status, next_verification_status, remediate,
    verify,
};
