//! Approval lifecycle: statuses, actions, and the transition table.

use greenlight_auth::ResourceAction;
use serde::{Deserialize, Serialize};

/// Where a resource sits in the approval lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Draft,
    InReview,
    Approved,
    Rejected,
    ChangesRequested,
}

impl ApprovalStatus {
    /// The exhaustive transition table. Anything not listed here is rejected.
    ///
    /// | From             | To                                           |
    /// |------------------|----------------------------------------------|
    /// | Draft            | InReview                                     |
    /// | InReview         | Approved, Rejected, ChangesRequested, Draft  |
    /// | Approved         | Draft                                        |
    /// | Rejected         | Draft                                        |
    /// | ChangesRequested | Draft, InReview                              |
    pub fn allowed_targets(&self) -> &'static [ApprovalStatus] {
        use ApprovalStatus::*;
        match self {
            Draft => &[InReview],
            InReview => &[Approved, Rejected, ChangesRequested, Draft],
            Approved => &[Draft],
            Rejected => &[Draft],
            ChangesRequested => &[Draft, InReview],
        }
    }

    pub fn can_transition_to(&self, target: ApprovalStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Draft => "draft",
            ApprovalStatus::InReview => "in_review",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::ChangesRequested => "changes_requested",
        }
    }

    pub const ALL: [ApprovalStatus; 5] = [
        ApprovalStatus::Draft,
        ApprovalStatus::InReview,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
        ApprovalStatus::ChangesRequested,
    ];
}

impl core::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-facing operation on the lifecycle. Each action maps to exactly
/// one target status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    SubmitForReview,
    Approve,
    Reject,
    RequestChanges,
    RevertToDraft,
}

impl ApprovalAction {
    pub const ALL: [ApprovalAction; 5] = [
        ApprovalAction::SubmitForReview,
        ApprovalAction::Approve,
        ApprovalAction::Reject,
        ApprovalAction::RequestChanges,
        ApprovalAction::RevertToDraft,
    ];

    /// Status this action drives the resource to.
    pub fn target_status(&self) -> ApprovalStatus {
        match self {
            ApprovalAction::SubmitForReview => ApprovalStatus::InReview,
            ApprovalAction::Approve => ApprovalStatus::Approved,
            ApprovalAction::Reject => ApprovalStatus::Rejected,
            ApprovalAction::RequestChanges => ApprovalStatus::ChangesRequested,
            ApprovalAction::RevertToDraft => ApprovalStatus::Draft,
        }
    }

    /// The permission-table action this lifecycle action corresponds to.
    pub fn as_permission(&self) -> ResourceAction {
        match self {
            ApprovalAction::SubmitForReview => ResourceAction::SubmitForReview,
            ApprovalAction::Approve => ResourceAction::Approve,
            ApprovalAction::Reject => ResourceAction::Reject,
            ApprovalAction::RequestChanges => ResourceAction::RequestChanges,
            ApprovalAction::RevertToDraft => ResourceAction::RevertToDraft,
        }
    }

    /// Actions reserved for approvers (vs. reviewers/submitters).
    pub fn requires_approver(&self) -> bool {
        matches!(
            self,
            ApprovalAction::Approve | ApprovalAction::Reject | ApprovalAction::RequestChanges
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::SubmitForReview => "submit_for_review",
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::RequestChanges => "request_changes",
            ApprovalAction::RevertToDraft => "revert_to_draft",
        }
    }
}

impl core::fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ApprovalAction {
    type Err = greenlight_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submit_for_review" => Ok(ApprovalAction::SubmitForReview),
            "approve" => Ok(ApprovalAction::Approve),
            "reject" => Ok(ApprovalAction::Reject),
            "request_changes" => Ok(ApprovalAction::RequestChanges),
            "revert_to_draft" => Ok(ApprovalAction::RevertToDraft),
            other => Err(greenlight_core::DomainError::validation(format!(
                "unrecognized action: {other}"
            ))),
        }
    }
}
