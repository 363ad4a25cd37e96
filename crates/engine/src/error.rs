//! Engine error taxonomy.
//!
//! Expected, anticipated failures (permission, transition, validation) are
//! ordinary `Err` values callers can render without special-casing control
//! flow. Only `Store` represents an infrastructure fault; when it surfaces,
//! the resource is guaranteed to be exactly as it was before the call.

use greenlight_auth::Role;
use greenlight_core::DomainError;
use greenlight_resource::ApprovalStatus;
use greenlight_store::StoreError;
use greenlight_workspace::{DirectoryError, WorkspaceStoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Resource, workspace, or member missing.
    #[error("not found")]
    NotFound,

    /// Role insufficient for the action. `required_role` is the minimum
    /// role that would satisfy the request, when computable.
    #[error("permission denied: {reason}")]
    PermissionDenied {
        reason: String,
        required_role: Option<Role>,
    },

    /// The requested status change is not in the transition table.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: ApprovalStatus,
        to: ApprovalStatus,
    },

    /// Unrecognized action name.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// A precondition failed (e.g. missing required comment, disabled
    /// workflow).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Concurrent-modification detected (stale version on save).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying persistence failure. No partial mutation is visible.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => EngineError::Conflict(msg),
            other => EngineError::Store(other),
        }
    }
}

impl From<DirectoryError> for EngineError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::WorkspaceNotFound
            | DirectoryError::MemberNotFound
            | DirectoryError::InvitationNotFound => EngineError::NotFound,
            DirectoryError::InvitationNotPending(status) => {
                EngineError::Validation(format!("invitation is {status}, not pending"))
            }
            DirectoryError::InvitationExpired => {
                EngineError::Validation("invitation has expired".to_string())
            }
            DirectoryError::Domain(DomainError::NotFound) => EngineError::NotFound,
            DirectoryError::Domain(DomainError::Conflict(msg)) => EngineError::Conflict(msg),
            DirectoryError::Domain(other) => EngineError::Validation(other.to_string()),
            DirectoryError::Store(WorkspaceStoreError::Storage(msg)) => {
                EngineError::Store(StoreError::Storage(msg))
            }
        }
    }
}
