//! Resource comments.

use chrono::{DateTime, Utc};
use greenlight_core::{CommentId, ResourceId, ResourceType};
use serde::{Deserialize, Serialize};

use crate::history::Actor;

/// A comment attached to an approvable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub resource_id: ResourceId,
    pub resource_type: ResourceType,
    pub author: Actor,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Internal comments are visible to workspace members only, not to
    /// external reviewers the host may expose resources to.
    pub is_internal: bool,
    pub attachments: Vec<String>,
}

impl Comment {
    pub fn new(
        resource_id: ResourceId,
        resource_type: ResourceType,
        author: Actor,
        content: impl Into<String>,
        is_internal: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::new(),
            resource_id,
            resource_type,
            author,
            content: content.into(),
            created_at,
            is_internal,
            attachments: Vec::new(),
        }
    }
}
