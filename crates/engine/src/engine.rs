//! The approval engine.

use std::sync::Arc;

use chrono::Utc;
use greenlight_auth::{ResourceAction, Role};
use greenlight_core::{ExpectedVersion, ResourceId, WorkspaceId};
use greenlight_notify::NotificationDispatcher;
use greenlight_resource::{
    Actor, ApprovableResource, ApprovalAction, ApprovalStatus, Comment, ResourcePayload,
    StatusChange,
};
use greenlight_store::{ResourceFilter, ResourceStore};
use greenlight_workspace::{ApprovalWorkflowSettings, Workspace, WorkspaceDirectory};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::stats::ApprovalStatistics;

/// Successful result of a lifecycle action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub new_status: ApprovalStatus,
    pub status_change: StatusChange,
    pub message: String,
}

/// The state machine: validates and applies status transitions, enforces
/// authorization, appends audit entries, persists, and notifies.
///
/// Construct one per process (or per test), parameterized by a store
/// implementation; there are no module-level singletons.
pub struct ApprovalEngine {
    resources: Arc<dyn ResourceStore>,
    directory: Arc<WorkspaceDirectory>,
    dispatcher: NotificationDispatcher,
}

impl ApprovalEngine {
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        directory: Arc<WorkspaceDirectory>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            resources,
            directory,
            dispatcher,
        }
    }

    /// Create a resource in `Draft` with an empty history.
    pub fn create_resource(
        &self,
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        description: Option<String>,
        payload: ResourcePayload,
        creator: &Actor,
        tags: Vec<String>,
    ) -> Result<ApprovableResource, EngineError> {
        let workspace = self.directory.workspace(workspace_id)?;
        let member_role = self.membership_role(&workspace, creator)?;
        self.check_table(member_role, payload.resource_type(), ResourceAction::Create)?;

        let resource = ApprovableResource::new(
            workspace_id,
            name,
            description,
            payload,
            creator,
            tags,
            Utc::now(),
        );
        let stored = self.resources.save(resource, ExpectedVersion::Exact(0))?;
        info!(
            resource_id = %stored.id,
            workspace_id = %workspace_id,
            resource_type = %stored.resource_type(),
            "resource created"
        );
        Ok(stored)
    }

    /// Drive a resource through one lifecycle transition.
    ///
    /// Expected failures (`NotFound`, `PermissionDenied`, `InvalidTransition`,
    /// `Validation`, `Conflict`) leave the resource byte-for-byte unchanged.
    pub fn perform_action(
        &self,
        resource_id: ResourceId,
        action: ApprovalAction,
        actor: &Actor,
        comment: Option<String>,
        reason: Option<String>,
    ) -> Result<ActionOutcome, EngineError> {
        // 1. Load the resource.
        let resource = self
            .resources
            .get(resource_id)?
            .ok_or(EngineError::NotFound)?;

        // 2. Workspace settings gate.
        let workspace = self.directory.workspace(resource.workspace_id)?;
        let settings = &workspace.settings;
        if !settings.enabled && action != ApprovalAction::RevertToDraft {
            return Err(EngineError::Validation(
                "approval workflow is disabled for this workspace".to_string(),
            ));
        }

        // 3. Authorization: static table first, then the workspace's
        //    configured role lists. Membership role is authoritative over
        //    whatever the caller put in `actor.role`.
        let member_role = self.membership_role(&workspace, actor)?;
        self.check_table(member_role, resource.resource_type(), action.as_permission())?;
        self.check_settings(settings, member_role, action, actor, &resource)?;

        // 4. Target status from the action.
        let target = action.target_status();

        // 5. Transition table validation.
        let current = resource.approval_status;
        if !current.can_transition_to(target) {
            return Err(EngineError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        // 6. Comment requirement.
        if settings.require_comment_on_reject
            && matches!(
                action,
                ApprovalAction::Reject | ApprovalAction::RequestChanges
            )
            && comment.is_none()
            && reason.is_none()
        {
            return Err(EngineError::Validation(format!(
                "a comment or reason is required to {action}"
            )));
        }

        // 7-8. Build the audit record, mutate a working copy, attach the
        //      comment if one was supplied.
        let now = Utc::now();
        let effective_actor = Actor {
            role: member_role,
            ..actor.clone()
        };
        let change = StatusChange::new(
            resource.id,
            resource.resource_type(),
            Some(current),
            target,
            effective_actor.clone(),
            reason.clone().or_else(|| comment.clone()),
            now,
        );

        let expected = ExpectedVersion::Exact(resource.version);
        let mut updated = resource;
        updated.apply_change(change.clone(), action);
        if let Some(text) = comment {
            updated.add_comment(Comment::new(
                updated.id,
                updated.resource_type(),
                effective_actor,
                text,
                false,
                now,
            ));
        }

        // 9. Persist all-or-nothing against the version we read.
        let saved = self.resources.save(updated, expected)?;
        info!(
            resource_id = %saved.id,
            action = %action,
            from = %current,
            to = %target,
            actor = %change.actor.user_id,
            "status transition applied"
        );

        // 10. Notification fan-out. The primary state change is already
        //     durable; a dispatch failure is logged, not surfaced.
        if settings.notify_on_status_change {
            if let Err(err) = self
                .dispatcher
                .dispatch_status_change(&saved, &change, action)
            {
                warn!(resource_id = %saved.id, error = %err, "notification dispatch failed");
            }
        }

        // 11. Outcome.
        Ok(ActionOutcome {
            new_status: saved.approval_status,
            status_change: change,
            message: format!("resource is now {}", saved.approval_status),
        })
    }

    /// String-keyed variant of [`perform_action`](Self::perform_action) for
    /// hosts that carry actions as text; unknown names fail with
    /// `InvalidAction`.
    pub fn perform_action_str(
        &self,
        resource_id: ResourceId,
        action: &str,
        actor: &Actor,
        comment: Option<String>,
        reason: Option<String>,
    ) -> Result<ActionOutcome, EngineError> {
        let action: ApprovalAction = action
            .parse()
            .map_err(|_| EngineError::InvalidAction(action.to_string()))?;
        self.perform_action(resource_id, action, actor, comment, reason)
    }

    /// Append a comment outside of a status transition.
    pub fn add_comment(
        &self,
        resource_id: ResourceId,
        author: &Actor,
        content: impl Into<String>,
        is_internal: bool,
    ) -> Result<Comment, EngineError> {
        let resource = self
            .resources
            .get(resource_id)?
            .ok_or(EngineError::NotFound)?;
        let workspace = self.directory.workspace(resource.workspace_id)?;
        let member_role = self.membership_role(&workspace, author)?;
        self.check_table(
            member_role,
            resource.resource_type(),
            ResourceAction::Comment,
        )?;

        let comment = Comment::new(
            resource.id,
            resource.resource_type(),
            Actor {
                role: member_role,
                ..author.clone()
            },
            content,
            is_internal,
            Utc::now(),
        );

        let expected = ExpectedVersion::Exact(resource.version);
        let mut updated = resource;
        updated.add_comment(comment.clone());
        let saved = self.resources.save(updated, expected)?;

        if let Err(err) = self.dispatcher.dispatch_comment_added(&saved, &comment) {
            warn!(resource_id = %saved.id, error = %err, "comment notification failed");
        }
        Ok(comment)
    }

    pub fn resource(&self, id: ResourceId) -> Result<ApprovableResource, EngineError> {
        self.resources.get(id)?.ok_or(EngineError::NotFound)
    }

    /// The resource's audit trail, in chronological order.
    pub fn history(&self, id: ResourceId) -> Result<Vec<StatusChange>, EngineError> {
        Ok(self.resource(id)?.approval_history)
    }

    pub fn comments(&self, id: ResourceId) -> Result<Vec<Comment>, EngineError> {
        Ok(self.resource(id)?.comments)
    }

    pub fn list_resources(
        &self,
        filter: &ResourceFilter,
    ) -> Result<Vec<ApprovableResource>, EngineError> {
        Ok(self.resources.list(filter)?)
    }

    /// Administrative delete; bypasses the state machine.
    pub fn delete_resource(&self, id: ResourceId) -> Result<bool, EngineError> {
        let removed = self.resources.delete(id)?;
        if removed {
            info!(resource_id = %id, "resource deleted (administrative)");
        }
        Ok(removed)
    }

    pub fn statistics(&self, filter: &ResourceFilter) -> Result<ApprovalStatistics, EngineError> {
        let resources = self.resources.list(filter)?;
        Ok(ApprovalStatistics::compute(&resources))
    }

    fn membership_role(
        &self,
        workspace: &Workspace,
        actor: &Actor,
    ) -> Result<Role, EngineError> {
        workspace
            .member(actor.user_id)
            .map(|m| m.role)
            .ok_or_else(|| EngineError::PermissionDenied {
                reason: "not a member of this workspace".to_string(),
                required_role: None,
            })
    }

    fn check_table(
        &self,
        role: Role,
        resource_type: greenlight_core::ResourceType,
        action: ResourceAction,
    ) -> Result<(), EngineError> {
        let check = self
            .directory
            .authorizer()
            .check_permission(role, resource_type, action);
        if check.allowed {
            Ok(())
        } else {
            Err(EngineError::PermissionDenied {
                reason: check
                    .reason
                    .unwrap_or_else(|| "permission denied".to_string()),
                required_role: check.required_role,
            })
        }
    }

    /// Workspace-configured role lists plus the creator-or-admin rule for
    /// reverts.
    fn check_settings(
        &self,
        settings: &ApprovalWorkflowSettings,
        role: Role,
        action: ApprovalAction,
        actor: &Actor,
        resource: &ApprovableResource,
    ) -> Result<(), EngineError> {
        match action {
            ApprovalAction::SubmitForReview => {
                if !settings.allowed_reviewer_roles.contains(&role) {
                    return Err(EngineError::PermissionDenied {
                        reason: format!(
                            "role '{role}' is not in this workspace's reviewer roles"
                        ),
                        required_role: settings.allowed_reviewer_roles.iter().copied().min(),
                    });
                }
            }
            ApprovalAction::Approve | ApprovalAction::Reject | ApprovalAction::RequestChanges => {
                if !settings.allowed_approver_roles.contains(&role) {
                    return Err(EngineError::PermissionDenied {
                        reason: format!(
                            "role '{role}' is not in this workspace's approver roles"
                        ),
                        required_role: settings.allowed_approver_roles.iter().copied().min(),
                    });
                }
            }
            ApprovalAction::RevertToDraft => {
                let is_creator = actor.user_id == resource.created_by;
                let is_admin = role >= Role::Admin;
                if !is_creator && !is_admin {
                    return Err(EngineError::PermissionDenied {
                        reason: "only the creator or an admin can revert to draft".to_string(),
                        required_role: Some(Role::Admin),
                    });
                }
            }
        }
        Ok(())
    }
}
