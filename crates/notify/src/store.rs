//! Notification persistence abstraction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use greenlight_core::{NotificationId, UserId};
use thiserror::Error;

use crate::notification::Notification;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification not found")]
    NotFound,

    #[error("storage failure: {0}")]
    Storage(String),
}

pub trait NotificationStore: Send + Sync {
    fn save(&self, notification: Notification) -> Result<(), NotifyError>;

    /// Notifications for a user, newest first.
    fn for_user(&self, user_id: UserId, unread_only: bool)
    -> Result<Vec<Notification>, NotifyError>;

    /// Set `read_at` if unset. Idempotent: marking twice has no additional
    /// effect.
    fn mark_read(&self, id: NotificationId) -> Result<Notification, NotifyError>;
}

impl<S> NotificationStore for Arc<S>
where
    S: NotificationStore + ?Sized,
{
    fn save(&self, notification: Notification) -> Result<(), NotifyError> {
        (**self).save(notification)
    }

    fn for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, NotifyError> {
        (**self).for_user(user_id, unread_only)
    }

    fn mark_read(&self, id: NotificationId) -> Result<Notification, NotifyError> {
        (**self).mark_read(id)
    }
}

/// In-memory notification store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<HashMap<NotificationId, Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> NotifyError {
        NotifyError::Storage("lock poisoned".to_string())
    }
}

impl NotificationStore for InMemoryNotificationStore {
    fn save(&self, notification: Notification) -> Result<(), NotifyError> {
        let mut map = self.notifications.write().map_err(|_| Self::poisoned())?;
        map.insert(notification.id, notification);
        Ok(())
    }

    fn for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, NotifyError> {
        let map = self.notifications.read().map_err(|_| Self::poisoned())?;
        let mut out: Vec<Notification> = map
            .values()
            .filter(|n| n.recipient_id == user_id && (!unread_only || !n.is_read()))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.as_uuid().cmp(a.id.as_uuid())));
        Ok(out)
    }

    fn mark_read(&self, id: NotificationId) -> Result<Notification, NotifyError> {
        let mut map = self.notifications.write().map_err(|_| Self::poisoned())?;
        let notification = map.get_mut(&id).ok_or(NotifyError::NotFound)?;
        if notification.read_at.is_none() {
            notification.read_at = Some(Utc::now());
        }
        Ok(notification.clone())
    }
}
