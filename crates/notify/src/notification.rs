//! Notification records.

use chrono::{DateTime, Utc};
use greenlight_core::{NotificationId, ResourceId, ResourceType, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// What happened, from the recipient's point of view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Submitted,
    Approved,
    Rejected,
    ChangesRequested,
    CommentAdded,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Submitted => "submitted",
            NotificationType::Approved => "approved",
            NotificationType::Rejected => "rejected",
            NotificationType::ChangesRequested => "changes_requested",
            NotificationType::CommentAdded => "comment_added",
        }
    }
}

impl core::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub workspace_id: WorkspaceId,
    pub recipient_id: UserId,
    pub recipient_email: String,
    pub resource_id: ResourceId,
    pub resource_type: ResourceType,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
