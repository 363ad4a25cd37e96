//! The approvable resource aggregate.

use chrono::{DateTime, Utc};
use greenlight_core::{ResourceId, ResourceType, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::history::{Actor, StatusChange};
use crate::status::{ApprovalAction, ApprovalStatus};

/// Type-specific payload, tagged by resource type.
///
/// Modeled as a closed sum (rather than an open bag of optional fields) so
/// adding a new resource type forces exhaustive handling everywhere the
/// payload is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource_type", rename_all = "snake_case")]
pub enum ResourcePayload {
    /// Generic ad creative.
    Ad {
        headline: Option<String>,
        media_url: Option<String>,
        call_to_action: Option<String>,
    },
    /// Campaign-level grouping.
    Campaign { objective: Option<String> },
    /// App store screenshot set.
    Screenshot {
        app_id: String,
        locale: String,
        device_type: String,
        image_urls: Vec<String>,
    },
    /// App store custom product page.
    CustomProductPage {
        app_id: String,
        locale: String,
        page_url: Option<String>,
    },
}

impl ResourcePayload {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourcePayload::Ad { .. } => ResourceType::Ad,
            ResourcePayload::Campaign { .. } => ResourceType::Campaign,
            ResourcePayload::Screenshot { .. } => ResourceType::Screenshot,
            ResourcePayload::CustomProductPage { .. } => ResourceType::CustomProductPage,
        }
    }

    /// App identifier, when the payload carries one.
    pub fn app_id(&self) -> Option<&str> {
        match self {
            ResourcePayload::Screenshot { app_id, .. }
            | ResourcePayload::CustomProductPage { app_id, .. } => Some(app_id),
            _ => None,
        }
    }

    pub fn locale(&self) -> Option<&str> {
        match self {
            ResourcePayload::Screenshot { locale, .. }
            | ResourcePayload::CustomProductPage { locale, .. } => Some(locale),
            _ => None,
        }
    }

    pub fn device_type(&self) -> Option<&str> {
        match self {
            ResourcePayload::Screenshot { device_type, .. } => Some(device_type),
            _ => None,
        }
    }
}

/// Any entity subject to the Draft → InReview → {Approved, Rejected,
/// ChangesRequested} lifecycle.
///
/// # Invariants
/// - Created in `Draft` with an empty history.
/// - `approval_history` is append-only; insertion order is chronological.
/// - Mutated only through the approval engine (administrative delete aside).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovableResource {
    pub id: ResourceId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub description: Option<String>,
    pub payload: ResourcePayload,
    pub tags: Vec<String>,

    pub created_by: UserId,
    pub created_by_name: String,
    pub created_by_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub approval_status: ApprovalStatus,
    pub approval_history: Vec<StatusChange>,
    pub comments: Vec<Comment>,

    pub submitted_for_review_at: Option<DateTime<Utc>>,
    pub submitted_for_review_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<UserId>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<UserId>,

    /// Monotonically increasing persisted version (bumped by the store on
    /// every successful save; used for optimistic concurrency).
    pub version: u64,
}

impl ApprovableResource {
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        description: Option<String>,
        payload: ResourcePayload,
        creator: &Actor,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ResourceId::new(),
            workspace_id,
            name: name.into(),
            description,
            payload,
            tags,
            created_by: creator.user_id,
            created_by_name: creator.name.clone(),
            created_by_email: creator.email.clone(),
            created_at: now,
            updated_at: now,
            approval_status: ApprovalStatus::Draft,
            approval_history: Vec::new(),
            comments: Vec::new(),
            submitted_for_review_at: None,
            submitted_for_review_by: None,
            approved_at: None,
            approved_by: None,
            rejected_at: None,
            rejected_by: None,
            version: 0,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.payload.resource_type()
    }

    /// Apply a validated transition: append the audit record, move the
    /// status, and stamp the action-specific timestamp/actor pair.
    ///
    /// Callers must have validated the transition against
    /// [`ApprovalStatus::can_transition_to`] first; this method does not
    /// re-check.
    pub fn apply_change(&mut self, change: StatusChange, action: ApprovalAction) {
        self.approval_status = change.to_status;
        match action {
            ApprovalAction::SubmitForReview => {
                self.submitted_for_review_at = Some(change.occurred_at);
                self.submitted_for_review_by = Some(change.actor.user_id);
            }
            ApprovalAction::Approve => {
                self.approved_at = Some(change.occurred_at);
                self.approved_by = Some(change.actor.user_id);
            }
            ApprovalAction::Reject => {
                self.rejected_at = Some(change.occurred_at);
                self.rejected_by = Some(change.actor.user_id);
            }
            // These actions stamp none of the three pairs.
            ApprovalAction::RequestChanges | ApprovalAction::RevertToDraft => {}
        }
        self.approval_history.push(change);
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Whether free-text `query` matches name, description, or tags
    /// (case-insensitive).
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&q))
            || self.tags.iter().any(|t| t.to_lowercase().contains(&q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenlight_auth::Role;

    fn creator() -> Actor {
        Actor::new(UserId::new(), "Dana", "dana@example.com", Role::Editor)
    }

    fn ad_payload() -> ResourcePayload {
        ResourcePayload::Ad {
            headline: Some("Summer Sale".to_string()),
            media_url: None,
            call_to_action: Some("Shop now".to_string()),
        }
    }

    #[test]
    fn new_resource_starts_in_draft_with_empty_history() {
        let r = ApprovableResource::new(
            WorkspaceId::new(),
            "Hero ad",
            None,
            ad_payload(),
            &creator(),
            vec![],
            Utc::now(),
        );
        assert_eq!(r.approval_status, ApprovalStatus::Draft);
        assert!(r.approval_history.is_empty());
        assert!(r.comments.is_empty());
        assert_eq!(r.version, 0);
    }

    #[test]
    fn apply_change_appends_history_and_stamps_pairs() {
        let actor = creator();
        let mut r = ApprovableResource::new(
            WorkspaceId::new(),
            "Hero ad",
            None,
            ad_payload(),
            &actor,
            vec![],
            Utc::now(),
        );

        let now = Utc::now();
        let change = StatusChange::new(
            r.id,
            r.resource_type(),
            Some(ApprovalStatus::Draft),
            ApprovalStatus::InReview,
            actor.clone(),
            None,
            now,
        );
        r.apply_change(change, ApprovalAction::SubmitForReview);

        assert_eq!(r.approval_status, ApprovalStatus::InReview);
        assert_eq!(r.approval_history.len(), 1);
        assert_eq!(r.submitted_for_review_at, Some(now));
        assert_eq!(r.submitted_for_review_by, Some(actor.user_id));
        assert!(r.approved_at.is_none());
        assert!(r.rejected_at.is_none());
    }

    #[test]
    fn request_changes_stamps_no_timestamp_pair() {
        let actor = creator();
        let mut r = ApprovableResource::new(
            WorkspaceId::new(),
            "Hero ad",
            None,
            ad_payload(),
            &actor,
            vec![],
            Utc::now(),
        );
        let change = StatusChange::new(
            r.id,
            r.resource_type(),
            Some(ApprovalStatus::InReview),
            ApprovalStatus::ChangesRequested,
            actor,
            Some("fix headline".to_string()),
            Utc::now(),
        );
        r.apply_change(change, ApprovalAction::RequestChanges);

        assert_eq!(r.approval_status, ApprovalStatus::ChangesRequested);
        assert!(r.submitted_for_review_at.is_none());
        assert!(r.approved_at.is_none());
        assert!(r.rejected_at.is_none());
    }

    #[test]
    fn payload_discriminant_and_app_fields() {
        let p = ResourcePayload::Screenshot {
            app_id: "123456".to_string(),
            locale: "en-US".to_string(),
            device_type: "iphone_6_7".to_string(),
            image_urls: vec![],
        };
        assert_eq!(p.resource_type(), ResourceType::Screenshot);
        assert_eq!(p.app_id(), Some("123456"));
        assert_eq!(p.device_type(), Some("iphone_6_7"));

        let ad = ResourcePayload::Ad {
            headline: None,
            media_url: None,
            call_to_action: None,
        };
        assert_eq!(ad.app_id(), None);
    }

    #[test]
    fn search_matches_name_description_and_tags() {
        let mut r = ApprovableResource::new(
            WorkspaceId::new(),
            "Hero ad",
            Some("Q3 launch creative".to_string()),
            ad_payload(),
            &creator(),
            vec!["summer".to_string()],
            Utc::now(),
        );
        assert!(r.matches_search("hero"));
        assert!(r.matches_search("LAUNCH"));
        assert!(r.matches_search("summer"));
        assert!(!r.matches_search("winter"));

        r.description = None;
        assert!(!r.matches_search("launch"));
    }
}
