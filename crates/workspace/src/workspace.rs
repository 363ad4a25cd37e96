//! Workspace, members, and per-workspace workflow settings.

use chrono::{DateTime, Utc};
use greenlight_auth::Role;
use greenlight_core::{DomainError, DomainResult, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// A user's membership within one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub invited_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            name: name.into(),
            role,
            invited_at: None,
            accepted_at: None,
            last_active_at: None,
        }
    }
}

/// Per-workspace approval workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalWorkflowSettings {
    pub enabled: bool,
    pub required_approvers: u32,
    pub allowed_approver_roles: Vec<Role>,
    pub allowed_reviewer_roles: Vec<Role>,
    pub auto_approve_owner: bool,
    pub require_comment_on_reject: bool,
    pub notify_on_status_change: bool,
    pub notify_approvers: bool,
}

impl Default for ApprovalWorkflowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            required_approvers: 1,
            allowed_approver_roles: vec![Role::Admin, Role::Owner],
            allowed_reviewer_roles: vec![Role::Editor, Role::Admin, Role::Owner],
            auto_approve_owner: false,
            require_comment_on_reject: true,
            notify_on_status_change: true,
            notify_approvers: true,
        }
    }
}

/// Tenant boundary containing members and approvable resources.
///
/// # Invariants
/// - `owner_id` always identifies a member with role `Owner`.
/// - Exactly one member has role `Owner` at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub owner_id: UserId,
    pub members: Vec<Member>,
    pub settings: ApprovalWorkflowSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Create a workspace, seeding `owner` as the sole Owner member.
    pub fn create(
        name: impl Into<String>,
        owner_id: UserId,
        owner_email: impl Into<String>,
        owner_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut owner = Member::new(owner_id, owner_email, owner_name, Role::Owner);
        owner.accepted_at = Some(now);
        Self {
            id: WorkspaceId::new(),
            name: name.into(),
            owner_id,
            members: vec![owner],
            settings: ApprovalWorkflowSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn member(&self, user_id: UserId) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn member_by_email(&self, email: &str) -> Option<&Member> {
        let email = email.to_lowercase();
        self.members
            .iter()
            .find(|m| m.email.to_lowercase() == email)
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.member(user_id).is_some()
    }

    /// Add a member. Fails if the user is already a member.
    pub fn add_member(&mut self, member: Member) -> DomainResult<()> {
        if self.is_member(member.user_id) {
            return Err(DomainError::conflict("user is already a member"));
        }
        self.members.push(member);
        Ok(())
    }

    /// Remove a member. The owner cannot be removed, only transferred.
    pub fn remove_member(&mut self, user_id: UserId) -> DomainResult<()> {
        if user_id == self.owner_id {
            return Err(DomainError::invariant(
                "cannot remove the workspace owner; transfer ownership first",
            ));
        }
        if !self.is_member(user_id) {
            return Err(DomainError::NotFound);
        }
        self.members.retain(|m| m.user_id != user_id);
        Ok(())
    }

    /// Change a member's role. The owner's role can only be changed through
    /// ownership transfer.
    pub fn update_member_role(&mut self, user_id: UserId, role: Role) -> DomainResult<()> {
        if user_id == self.owner_id && role != Role::Owner {
            return Err(DomainError::invariant(
                "cannot demote the workspace owner; transfer ownership first",
            ));
        }
        if role == Role::Owner && user_id != self.owner_id {
            return Err(DomainError::invariant(
                "use ownership transfer to promote a member to owner",
            ));
        }
        let member = self
            .members
            .iter_mut()
            .find(|m| m.user_id == user_id)
            .ok_or(DomainError::NotFound)?;
        member.role = role;
        Ok(())
    }

    /// Transfer ownership in one in-memory mutation: demote the prior owner
    /// to Admin, promote the target to Owner, update `owner_id`.
    ///
    /// Persisting this as a single write keeps the one-owner invariant from
    /// ever being observably violated.
    pub fn transfer_ownership(&mut self, new_owner_id: UserId) -> DomainResult<()> {
        if new_owner_id == self.owner_id {
            return Err(DomainError::validation("user is already the owner"));
        }
        if !self.is_member(new_owner_id) {
            return Err(DomainError::NotFound);
        }

        let prior_owner_id = self.owner_id;
        for member in &mut self.members {
            if member.user_id == prior_owner_id {
                member.role = Role::Admin;
            } else if member.user_id == new_owner_id {
                member.role = Role::Owner;
            }
        }
        self.owner_id = new_owner_id;
        Ok(())
    }

    /// Count of members holding the Owner role (invariant: always 1).
    pub fn owner_count(&self) -> usize {
        self.members.iter().filter(|m| m.role == Role::Owner).count()
    }
}
