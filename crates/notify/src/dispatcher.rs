//! Building and fanning out notifications.

use std::sync::Arc;

use chrono::Utc;
use greenlight_core::{NotificationId, UserId};
use greenlight_resource::{ApprovableResource, ApprovalAction, Comment, StatusChange};
use tracing::debug;

use crate::notification::{Notification, NotificationType};
use crate::store::{NotificationStore, NotifyError};

/// Emits one notification record per relevant recipient on each transition.
pub struct NotificationDispatcher {
    store: Arc<dyn NotificationStore>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Notify about a status change.
    ///
    /// Recipients: the resource creator, excluding the actor when the actor
    /// is the creator. `revert_to_draft` has no notification type and
    /// dispatches nothing.
    pub fn dispatch_status_change(
        &self,
        resource: &ApprovableResource,
        change: &StatusChange,
        action: ApprovalAction,
    ) -> Result<Vec<Notification>, NotifyError> {
        let Some(kind) = Self::type_for(action) else {
            return Ok(Vec::new());
        };

        let mut recipients: Vec<(UserId, &str)> = Vec::new();
        if change.actor.user_id != resource.created_by {
            recipients.push((resource.created_by, resource.created_by_email.as_str()));
        }

        let (title, message) = Self::render(kind, resource, change);
        let mut out = Vec::with_capacity(recipients.len());
        for (recipient_id, recipient_email) in recipients {
            let notification = Notification {
                id: NotificationId::new(),
                workspace_id: resource.workspace_id,
                recipient_id,
                recipient_email: recipient_email.to_string(),
                resource_id: resource.id,
                resource_type: resource.resource_type(),
                notification_type: kind,
                title: title.clone(),
                message: message.clone(),
                action_url: Some(format!("/resources/{}", resource.id)),
                created_at: Utc::now(),
                read_at: None,
            };
            self.store.save(notification.clone())?;
            out.push(notification);
        }
        debug!(
            resource_id = %resource.id,
            kind = %kind,
            count = out.len(),
            "dispatched status-change notifications"
        );
        Ok(out)
    }

    /// Notify the resource creator that someone else commented.
    pub fn dispatch_comment_added(
        &self,
        resource: &ApprovableResource,
        comment: &Comment,
    ) -> Result<Vec<Notification>, NotifyError> {
        if comment.author.user_id == resource.created_by {
            return Ok(Vec::new());
        }

        let notification = Notification {
            id: NotificationId::new(),
            workspace_id: resource.workspace_id,
            recipient_id: resource.created_by,
            recipient_email: resource.created_by_email.clone(),
            resource_id: resource.id,
            resource_type: resource.resource_type(),
            notification_type: NotificationType::CommentAdded,
            title: format!("New comment on \"{}\"", resource.name),
            message: format!("{} commented: {}", comment.author.name, comment.content),
            action_url: Some(format!("/resources/{}", resource.id)),
            created_at: Utc::now(),
            read_at: None,
        };
        self.store.save(notification.clone())?;
        Ok(vec![notification])
    }

    /// Notifications for a user, newest first.
    pub fn user_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, NotifyError> {
        self.store.for_user(user_id, unread_only)
    }

    /// Mark a notification read (idempotent).
    pub fn mark_read(&self, id: NotificationId) -> Result<Notification, NotifyError> {
        self.store.mark_read(id)
    }

    fn type_for(action: ApprovalAction) -> Option<NotificationType> {
        match action {
            ApprovalAction::SubmitForReview => Some(NotificationType::Submitted),
            ApprovalAction::Approve => Some(NotificationType::Approved),
            ApprovalAction::Reject => Some(NotificationType::Rejected),
            ApprovalAction::RequestChanges => Some(NotificationType::ChangesRequested),
            ApprovalAction::RevertToDraft => None,
        }
    }

    fn render(
        kind: NotificationType,
        resource: &ApprovableResource,
        change: &StatusChange,
    ) -> (String, String) {
        let actor = change.actor.name.as_str();
        let name = resource.name.as_str();
        match kind {
            NotificationType::Submitted => (
                format!("Review requested: {name}"),
                format!("{actor} submitted \"{name}\" for review"),
            ),
            NotificationType::Approved => (
                format!("Approved: {name}"),
                format!("{actor} approved \"{name}\""),
            ),
            NotificationType::Rejected => (
                format!("Rejected: {name}"),
                match &change.reason {
                    Some(reason) => format!("{actor} rejected \"{name}\": {reason}"),
                    None => format!("{actor} rejected \"{name}\""),
                },
            ),
            NotificationType::ChangesRequested => (
                format!("Changes requested: {name}"),
                match &change.reason {
                    Some(reason) => format!("{actor} requested changes on \"{name}\": {reason}"),
                    None => format!("{actor} requested changes on \"{name}\""),
                },
            ),
            NotificationType::CommentAdded => (
                format!("New comment on \"{name}\""),
                format!("{actor} commented on \"{name}\""),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryNotificationStore;
    use greenlight_auth::Role;
    use greenlight_core::WorkspaceId;
    use greenlight_resource::{Actor, ApprovalStatus, ResourcePayload};

    fn resource_and_creator() -> (ApprovableResource, Actor) {
        let creator = Actor::new(UserId::new(), "Dana", "dana@example.com", Role::Editor);
        let resource = ApprovableResource::new(
            WorkspaceId::new(),
            "Hero ad",
            None,
            ResourcePayload::Ad {
                headline: None,
                media_url: None,
                call_to_action: None,
            },
            &creator,
            vec![],
            Utc::now(),
        );
        (resource, creator)
    }

    fn approver() -> Actor {
        Actor::new(UserId::new(), "Avery", "avery@example.com", Role::Admin)
    }

    fn change(resource: &ApprovableResource, actor: Actor, to: ApprovalStatus) -> StatusChange {
        StatusChange::new(
            resource.id,
            resource.resource_type(),
            Some(ApprovalStatus::InReview),
            to,
            actor,
            Some("fix headline".to_string()),
            Utc::now(),
        )
    }

    fn dispatcher() -> NotificationDispatcher {
        NotificationDispatcher::new(Arc::new(InMemoryNotificationStore::new()))
    }

    #[test]
    fn creator_is_notified_when_someone_else_acts() {
        let d = dispatcher();
        let (resource, _creator) = resource_and_creator();
        let c = change(&resource, approver(), ApprovalStatus::ChangesRequested);

        let sent = d
            .dispatch_status_change(&resource, &c, ApprovalAction::RequestChanges)
            .unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_id, resource.created_by);
        assert_eq!(sent[0].notification_type, NotificationType::ChangesRequested);
        assert!(sent[0].message.contains("fix headline"));
    }

    #[test]
    fn actor_who_is_creator_is_not_notified() {
        let d = dispatcher();
        let (resource, creator) = resource_and_creator();
        let c = change(&resource, creator, ApprovalStatus::InReview);

        let sent = d
            .dispatch_status_change(&resource, &c, ApprovalAction::SubmitForReview)
            .unwrap();
        assert!(sent.is_empty());
    }

    #[test]
    fn revert_to_draft_dispatches_nothing() {
        let d = dispatcher();
        let (resource, _) = resource_and_creator();
        let c = change(&resource, approver(), ApprovalStatus::Draft);

        let sent = d
            .dispatch_status_change(&resource, &c, ApprovalAction::RevertToDraft)
            .unwrap();
        assert!(sent.is_empty());
    }

    #[test]
    fn user_notifications_newest_first_and_unread_filter() {
        let d = dispatcher();
        let (resource, _) = resource_and_creator();
        let actor = approver();

        let first = d
            .dispatch_status_change(
                &resource,
                &change(&resource, actor.clone(), ApprovalStatus::Rejected),
                ApprovalAction::Reject,
            )
            .unwrap();
        let second = d
            .dispatch_status_change(
                &resource,
                &change(&resource, actor, ApprovalStatus::Approved),
                ApprovalAction::Approve,
            )
            .unwrap();

        let all = d.user_notifications(resource.created_by, false).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);

        d.mark_read(first[0].id).unwrap();
        let unread = d.user_notifications(resource.created_by, true).unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, second[0].id);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let d = dispatcher();
        let (resource, _) = resource_and_creator();
        let sent = d
            .dispatch_status_change(
                &resource,
                &change(&resource, approver(), ApprovalStatus::Approved),
                ApprovalAction::Approve,
            )
            .unwrap();

        let once = d.mark_read(sent[0].id).unwrap();
        let read_at = once.read_at.unwrap();
        let twice = d.mark_read(sent[0].id).unwrap();
        assert_eq!(twice.read_at, Some(read_at));
    }

    #[test]
    fn comment_by_someone_else_notifies_creator() {
        let d = dispatcher();
        let (resource, _) = resource_and_creator();
        let comment = Comment::new(
            resource.id,
            resource.resource_type(),
            approver(),
            "Looks off-brand",
            false,
            Utc::now(),
        );

        let sent = d.dispatch_comment_added(&resource, &comment).unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].notification_type, NotificationType::CommentAdded);
    }
}
