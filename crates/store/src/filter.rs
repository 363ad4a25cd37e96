//! Filterable listing of approvable resources.

use chrono::{DateTime, Utc};
use greenlight_core::{ResourceType, UserId, WorkspaceId};
use greenlight_resource::{ApprovableResource, ApprovalStatus};
use serde::{Deserialize, Serialize};

/// Filter for `ResourceStore::list`. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceFilter {
    pub workspace_id: Option<WorkspaceId>,
    pub resource_types: Vec<ResourceType>,
    pub statuses: Vec<ApprovalStatus>,
    pub app_id: Option<String>,
    pub locale: Option<String>,
    pub device_type: Option<String>,
    pub created_by: Option<UserId>,
    /// A resource matches when it carries every requested tag.
    pub tags: Vec<String>,
    /// Free-text search over name, description, and tags (case-insensitive).
    pub search: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl ResourceFilter {
    pub fn for_workspace(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id: Some(workspace_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ApprovalStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_types.push(resource_type);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// Whether `resource` satisfies every populated criterion.
    pub fn matches(&self, resource: &ApprovableResource) -> bool {
        if let Some(ws) = self.workspace_id {
            if resource.workspace_id != ws {
                return false;
            }
        }
        if !self.resource_types.is_empty()
            && !self.resource_types.contains(&resource.resource_type())
        {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&resource.approval_status) {
            return false;
        }
        if let Some(app_id) = &self.app_id {
            if resource.payload.app_id() != Some(app_id.as_str()) {
                return false;
            }
        }
        if let Some(locale) = &self.locale {
            if resource.payload.locale() != Some(locale.as_str()) {
                return false;
            }
        }
        if let Some(device_type) = &self.device_type {
            if resource.payload.device_type() != Some(device_type.as_str()) {
                return false;
            }
        }
        if let Some(created_by) = self.created_by {
            if resource.created_by != created_by {
                return false;
            }
        }
        if !self.tags.is_empty() {
            let has_all = self.tags.iter().all(|t| resource.tags.contains(t));
            if !has_all {
                return false;
            }
        }
        if let Some(query) = &self.search {
            if !resource.matches_search(query) {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if resource.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if resource.created_at > before {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenlight_auth::Role;
    use greenlight_resource::{Actor, ResourcePayload};

    fn screenshot(workspace_id: WorkspaceId, app_id: &str, locale: &str) -> ApprovableResource {
        let creator = Actor::new(UserId::new(), "Dana", "dana@example.com", Role::Editor);
        ApprovableResource::new(
            workspace_id,
            "Store shots",
            None,
            ResourcePayload::Screenshot {
                app_id: app_id.to_string(),
                locale: locale.to_string(),
                device_type: "iphone_6_7".to_string(),
                image_urls: vec![],
            },
            &creator,
            vec!["launch".to_string()],
            Utc::now(),
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        let r = screenshot(WorkspaceId::new(), "42", "en-US");
        assert!(ResourceFilter::default().matches(&r));
    }

    #[test]
    fn workspace_and_type_filters() {
        let ws = WorkspaceId::new();
        let r = screenshot(ws, "42", "en-US");

        assert!(ResourceFilter::for_workspace(ws).matches(&r));
        assert!(!ResourceFilter::for_workspace(WorkspaceId::new()).matches(&r));
        assert!(
            ResourceFilter::default()
                .with_resource_type(ResourceType::Screenshot)
                .matches(&r)
        );
        assert!(
            !ResourceFilter::default()
                .with_resource_type(ResourceType::Ad)
                .matches(&r)
        );
    }

    #[test]
    fn app_specific_filters() {
        let r = screenshot(WorkspaceId::new(), "42", "en-US");

        let mut f = ResourceFilter::default();
        f.app_id = Some("42".to_string());
        f.locale = Some("en-US".to_string());
        assert!(f.matches(&r));

        f.locale = Some("de-DE".to_string());
        assert!(!f.matches(&r));
    }

    #[test]
    fn tags_require_all_requested() {
        let r = screenshot(WorkspaceId::new(), "42", "en-US");
        let mut f = ResourceFilter::default();
        f.tags = vec!["launch".to_string()];
        assert!(f.matches(&r));
        f.tags.push("paid".to_string());
        assert!(!f.matches(&r));
    }

    #[test]
    fn date_range_is_inclusive_of_bounds() {
        let r = screenshot(WorkspaceId::new(), "42", "en-US");
        let mut f = ResourceFilter::default();
        f.created_after = Some(r.created_at);
        f.created_before = Some(r.created_at);
        assert!(f.matches(&r));

        f.created_after = Some(r.created_at + chrono::Duration::seconds(1));
        assert!(!f.matches(&r));
    }
}
