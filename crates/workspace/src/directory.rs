//! The workspace directory service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use greenlight_auth::{PermissionCheck, ResourceAction, Role, RoleAuthorizer};
use greenlight_core::{DomainError, InvitationId, ResourceType, UserId, WorkspaceId};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::invitation::{Invitation, InvitationStatus};
use crate::store::{WorkspaceStore, WorkspaceStoreError};
use crate::workspace::{ApprovalWorkflowSettings, Member, Workspace};

/// Directory operation error.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("workspace not found")]
    WorkspaceNotFound,

    #[error("member not found")]
    MemberNotFound,

    #[error("invitation not found")]
    InvitationNotFound,

    #[error("invitation is {0}, not pending")]
    InvitationNotPending(InvitationStatus),

    #[error("invitation has expired")]
    InvitationExpired,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] WorkspaceStoreError),
}

/// One (workspace, role) pair in a user's context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceMembership {
    pub workspace_id: WorkspaceId,
    pub workspace_name: String,
    pub role: Role,
}

/// All workspace/role pairs for a user across workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserContext {
    pub user_id: UserId,
    pub memberships: Vec<WorkspaceMembership>,
}

/// Owns workspace and membership lifecycle; supplies membership lookups to
/// the role authorizer.
pub struct WorkspaceDirectory {
    store: Arc<dyn WorkspaceStore>,
    authorizer: RoleAuthorizer,
}

impl WorkspaceDirectory {
    pub fn new(store: Arc<dyn WorkspaceStore>, authorizer: RoleAuthorizer) -> Self {
        Self { store, authorizer }
    }

    pub fn authorizer(&self) -> &RoleAuthorizer {
        &self.authorizer
    }

    fn load(&self, id: WorkspaceId) -> Result<Workspace, DirectoryError> {
        self.store
            .get(id)?
            .ok_or(DirectoryError::WorkspaceNotFound)
    }

    /// Create a workspace, seeding the creator as sole Owner member.
    pub fn create_workspace(
        &self,
        name: impl Into<String>,
        owner_id: UserId,
        owner_email: impl Into<String>,
        owner_name: impl Into<String>,
    ) -> Result<Workspace, DirectoryError> {
        let ws = Workspace::create(name, owner_id, owner_email, owner_name, Utc::now());
        self.store.save(ws.clone())?;
        info!(workspace_id = %ws.id, owner_id = %owner_id, "workspace created");
        Ok(ws)
    }

    pub fn workspace(&self, id: WorkspaceId) -> Result<Workspace, DirectoryError> {
        self.load(id)
    }

    pub fn add_member(
        &self,
        workspace_id: WorkspaceId,
        member: Member,
    ) -> Result<Workspace, DirectoryError> {
        let mut ws = self.load(workspace_id)?;
        let user_id = member.user_id;
        ws.add_member(member)?;
        ws.updated_at = Utc::now();
        self.store.save(ws.clone())?;
        info!(workspace_id = %workspace_id, user_id = %user_id, "member added");
        Ok(ws)
    }

    pub fn remove_member(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<Workspace, DirectoryError> {
        let mut ws = self.load(workspace_id)?;
        ws.remove_member(user_id)?;
        ws.updated_at = Utc::now();
        self.store.save(ws.clone())?;
        info!(workspace_id = %workspace_id, user_id = %user_id, "member removed");
        Ok(ws)
    }

    pub fn update_member_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: Role,
    ) -> Result<Workspace, DirectoryError> {
        let mut ws = self.load(workspace_id)?;
        ws.update_member_role(user_id, role)?;
        ws.updated_at = Utc::now();
        self.store.save(ws.clone())?;
        info!(workspace_id = %workspace_id, user_id = %user_id, role = %role, "member role updated");
        Ok(ws)
    }

    /// Atomic ownership transfer: demotion, promotion, and `owner_id` update
    /// land in one persisted write.
    pub fn transfer_ownership(
        &self,
        workspace_id: WorkspaceId,
        new_owner_id: UserId,
    ) -> Result<Workspace, DirectoryError> {
        let mut ws = self.load(workspace_id)?;
        ws.transfer_ownership(new_owner_id)?;
        ws.updated_at = Utc::now();
        self.store.save(ws.clone())?;
        info!(workspace_id = %workspace_id, new_owner_id = %new_owner_id, "ownership transferred");
        Ok(ws)
    }

    /// Replace the workspace's approval workflow settings.
    pub fn update_settings(
        &self,
        workspace_id: WorkspaceId,
        settings: ApprovalWorkflowSettings,
    ) -> Result<Workspace, DirectoryError> {
        let mut ws = self.load(workspace_id)?;
        ws.settings = settings;
        ws.updated_at = Utc::now();
        self.store.save(ws.clone())?;
        Ok(ws)
    }

    /// Create an invitation. Rejects emails that already belong to a member.
    pub fn create_invitation(
        &self,
        workspace_id: WorkspaceId,
        email: impl Into<String>,
        role: Role,
    ) -> Result<Invitation, DirectoryError> {
        let ws = self.load(workspace_id)?;
        let email = email.into();
        if ws.member_by_email(&email).is_some() {
            return Err(DomainError::conflict("email is already a member").into());
        }
        let invitation = Invitation::new(workspace_id, email, role, Utc::now());
        self.store.save_invitation(invitation.clone())?;
        info!(workspace_id = %workspace_id, invitation_id = %invitation.id, "invitation created");
        Ok(invitation)
    }

    /// Accept an invitation by token, adding the user as a member.
    ///
    /// Expired invitations flip to `Expired` as a side effect and the call
    /// fails; tokens are never reused.
    pub fn accept_invitation(
        &self,
        token: &str,
        user_id: UserId,
        user_name: impl Into<String>,
    ) -> Result<Workspace, DirectoryError> {
        let mut invitation = self
            .store
            .invitation_by_token(token)?
            .ok_or(DirectoryError::InvitationNotFound)?;

        if !invitation.is_pending() {
            return Err(DirectoryError::InvitationNotPending(invitation.status));
        }

        let now = Utc::now();
        if invitation.is_expired(now) {
            invitation.status = InvitationStatus::Expired;
            self.store.save_invitation(invitation.clone())?;
            warn!(invitation_id = %invitation.id, "invitation expired on acceptance attempt");
            return Err(DirectoryError::InvitationExpired);
        }

        let mut ws = self.load(invitation.workspace_id)?;
        let mut member = Member::new(user_id, invitation.email.clone(), user_name, invitation.role);
        member.invited_at = Some(invitation.created_at);
        member.accepted_at = Some(now);
        ws.add_member(member)?;
        ws.updated_at = now;

        invitation.status = InvitationStatus::Accepted;
        self.store.save(ws.clone())?;
        self.store.save_invitation(invitation.clone())?;
        info!(workspace_id = %ws.id, user_id = %user_id, invitation_id = %invitation.id, "invitation accepted");
        Ok(ws)
    }

    pub fn revoke_invitation(&self, id: InvitationId) -> Result<Invitation, DirectoryError> {
        let mut invitation = self
            .store
            .invitation(id)?
            .ok_or(DirectoryError::InvitationNotFound)?;
        if !invitation.is_pending() {
            return Err(DirectoryError::InvitationNotPending(invitation.status));
        }
        invitation.status = InvitationStatus::Revoked;
        self.store.save_invitation(invitation.clone())?;
        info!(invitation_id = %invitation.id, "invitation revoked");
        Ok(invitation)
    }

    /// Aggregate all workspace/role pairs for a user across workspaces.
    pub fn user_context(&self, user_id: UserId) -> Result<UserContext, DirectoryError> {
        let memberships = self
            .store
            .list_for_user(user_id)?
            .into_iter()
            .filter_map(|ws| {
                ws.member(user_id).map(|m| WorkspaceMembership {
                    workspace_id: ws.id,
                    workspace_name: ws.name.clone(),
                    role: m.role,
                })
            })
            .collect();
        Ok(UserContext {
            user_id,
            memberships,
        })
    }

    /// The caller's role in a workspace, if they are a member.
    pub fn member_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> Result<Option<Role>, DirectoryError> {
        let ws = self.load(workspace_id)?;
        Ok(ws.member(user_id).map(|m| m.role))
    }

    /// Membership-resolving permission check: deny non-members outright,
    /// otherwise consult the data-driven permission table.
    pub fn check_permission(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
        resource_type: ResourceType,
        action: ResourceAction,
    ) -> Result<PermissionCheck, DirectoryError> {
        let ws = self.load(workspace_id)?;
        match ws.member(user_id) {
            None => Ok(PermissionCheck::deny(
                "not a member of this workspace",
                None,
            )),
            Some(member) => Ok(self
                .authorizer
                .check_permission(member.role, resource_type, action)),
        }
    }
}
