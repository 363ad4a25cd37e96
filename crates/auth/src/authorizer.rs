//! Authorization decisions.

use greenlight_core::ResourceType;
use serde::Serialize;

use crate::{PermissionTable, ResourceAction, Role, role::has_role_or_higher};

/// Outcome of a permission check.
///
/// Denials carry a human-readable reason and, when computable, the minimum
/// role that would satisfy the request so callers can surface it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionCheck {
    pub allowed: bool,
    pub reason: Option<String>,
    pub required_role: Option<Role>,
}

impl PermissionCheck {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            required_role: None,
        }
    }

    pub fn deny(reason: impl Into<String>, required_role: Option<Role>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            required_role,
        }
    }
}

/// Pure function of (role, resource type, action) → allow/deny + reason.
///
/// - No IO
/// - No hidden state beyond the injected table
/// - Safe to call concurrently from multiple callers
#[derive(Debug, Clone, Default)]
pub struct RoleAuthorizer {
    table: PermissionTable,
}

impl RoleAuthorizer {
    pub fn new(table: PermissionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// Check whether `role` may perform `action` on `resource_type`.
    pub fn check_permission(
        &self,
        role: Role,
        resource_type: ResourceType,
        action: ResourceAction,
    ) -> PermissionCheck {
        if self.table.allows(role, resource_type, action) {
            return PermissionCheck::allow();
        }

        let required = self.table.min_role_for(resource_type, action);
        let reason = match required {
            Some(required) => format!(
                "role '{role}' cannot perform '{action}' on '{resource_type}'; requires '{required}' or higher"
            ),
            None => format!("no role can perform '{action}' on '{resource_type}'"),
        };
        PermissionCheck::deny(reason, required)
    }

    /// Direct hierarchy-index comparison.
    pub fn has_role_or_higher(&self, role: Role, required: Role) -> bool {
        has_role_or_higher(role, required)
    }
}
