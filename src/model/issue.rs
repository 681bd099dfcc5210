//! Issues: discovered vulnerabilities and their verification/remediation state.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vulnerability found by a scan or audit.
///
/// Created elsewhere and handed to this crate. Only the lifecycle
/// transitions mutate it; it is never deleted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve_id: Option<String>,

    #[serde(default)]
    pub verification_status: VerificationStatus,

    /// Absent until remediation is first attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_status: Option<RemediationStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reproduction_steps: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_steps: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediated_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediated_by: Option<String>,

    /// Append-only.
    #[serde(default)]
    pub reproduction_sessions: Vec<Session>,

    /// Append-only.
    #[serde(default)]
    pub remediation_sessions: Vec<Session>,
}

impl Issue {
    /// A fresh, unreviewed issue.
    pub fn new(id: impl Into<String>, title: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            severity,
            category: None,
            cvss_score: None,
            cve_id: None,
            verification_status: VerificationStatus::Pending,
            remediation_status: None,
            reproduction_steps: None,
            remediation_steps: None,
            reviewer_notes: None,
            confirmed_at: None,
            confirmed_by: None,
            remediated_at: None,
            remediated_by: None,
            reproduction_sessions: Vec::new(),
            remediation_sessions: Vec::new(),
        }
    }

    /// Whether an external action is outstanding on either axis.
    pub fn is_in_flight(&self) -> bool {
        self.verification_status == VerificationStatus::Reproducing
            || self.remediation_status == Some(RemediationStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

/// Where an issue stands in review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Confirmed,
    Dismissed,
    NeedsInfo,

    /// In flight: a reproduction attempt is outstanding.
    Reproducing,
}

impl VerificationStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Dismissed,
        Self::NeedsInfo,
        Self::Reproducing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Dismissed => "dismissed",
            Self::NeedsInfo => "needs_info",
            Self::Reproducing => "reproducing",
        }
    }
}

/// Where an issue stands in remediation. Independent of verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationStatus {
    NotStarted,

    /// In flight: a remediation attempt is outstanding.
    InProgress,
    Applied,
    Failed,

    /// Set by an external verification step. Preserved, never computed.
    Verified,
}

impl RemediationStatus {
    pub const ALL: [Self; 5] = [
        Self::NotStarted,
        Self::InProgress,
        Self::Applied,
        Self::Failed,
        Self::Verified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Applied => "applied",
            Self::Failed => "failed",
            Self::Verified => "verified",
        }
    }
}

/// Which ledger a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Reproduction,
    Remediation,
}

/// An immutable record of one reproduction or remediation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub timestamp: Timestamp,
    pub status: SessionStatus,

    /// How the attempt was run (e.g. "automated", "manual").
    #[serde(rename = "type")]
    pub session_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_made: Option<Vec<String>>,
}

impl Session {
    /// A new session with a fresh id.
    pub fn new(
        session_type: impl Into<String>,
        status: SessionStatus,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            status,
            session_type: session_type.into(),
            notes: None,
            artifacts: None,
            changes_made: None,
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}
