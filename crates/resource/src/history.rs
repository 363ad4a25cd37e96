//! Append-only audit records for status changes.

use chrono::{DateTime, Utc};
use greenlight_auth::Role;
use greenlight_core::{ChangeId, ResourceId, ResourceType, UserId};
use serde::{Deserialize, Serialize};

use crate::status::ApprovalStatus;

/// Identity + role of whoever performed an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

/// One entry in a resource's audit trail. Immutable once created.
///
/// `from_status` is `None` only for the virtual "created" event; every real
/// transition records the status it moved away from, so for any history
/// `history[i].from_status == Some(history[i-1].to_status)` for `i > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub id: ChangeId,
    pub resource_id: ResourceId,
    pub resource_type: ResourceType,
    pub from_status: Option<ApprovalStatus>,
    pub to_status: ApprovalStatus,
    pub actor: Actor,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl StatusChange {
    pub fn new(
        resource_id: ResourceId,
        resource_type: ResourceType,
        from_status: Option<ApprovalStatus>,
        to_status: ApprovalStatus,
        actor: Actor,
        reason: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ChangeId::new(),
            resource_id,
            resource_type,
            from_status,
            to_status,
            actor,
            reason,
            occurred_at,
        }
    }
}
