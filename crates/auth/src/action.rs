//! Actions subject to role-based authorization.

use serde::{Deserialize, Serialize};

/// A named operation on an approvable resource, as seen by the permission
/// table.
///
/// `Manage` is the wildcard: a rule granting `Manage` satisfies any requested
/// action on the rule's resource type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceAction {
    View,
    Create,
    Edit,
    Delete,
    Comment,
    SubmitForReview,
    Approve,
    Reject,
    RequestChanges,
    RevertToDraft,
    /// Wildcard action; grants everything the rule's resource type covers.
    Manage,
}

impl ResourceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::View => "view",
            ResourceAction::Create => "create",
            ResourceAction::Edit => "edit",
            ResourceAction::Delete => "delete",
            ResourceAction::Comment => "comment",
            ResourceAction::SubmitForReview => "submit_for_review",
            ResourceAction::Approve => "approve",
            ResourceAction::Reject => "reject",
            ResourceAction::RequestChanges => "request_changes",
            ResourceAction::RevertToDraft => "revert_to_draft",
            ResourceAction::Manage => "manage",
        }
    }
}

impl core::fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
