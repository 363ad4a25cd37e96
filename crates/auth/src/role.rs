//! Workspace roles and the role hierarchy.

use serde::{Deserialize, Serialize};

/// A member's permission level within one workspace.
///
/// Roles are totally ordered: `Viewer < Editor < Admin < Owner`. The derived
/// `Ord` relies on variant declaration order, so keep the variants ascending.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
    Owner,
}

impl Role {
    /// All roles in ascending hierarchy order.
    pub const ASCENDING: [Role; 4] = [Role::Viewer, Role::Editor, Role::Admin, Role::Owner];

    /// Position in the hierarchy (Viewer = 0 … Owner = 3).
    pub fn hierarchy_index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direct hierarchy-index comparison.
pub fn has_role_or_higher(role: Role, required: Role) -> bool {
    role.hierarchy_index() >= required.hierarchy_index()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_is_total_and_ascending() {
        assert!(Role::Viewer < Role::Editor);
        assert!(Role::Editor < Role::Admin);
        assert!(Role::Admin < Role::Owner);
    }

    #[test]
    fn has_role_or_higher_compares_indices() {
        assert!(has_role_or_higher(Role::Owner, Role::Viewer));
        assert!(has_role_or_higher(Role::Editor, Role::Editor));
        assert!(!has_role_or_higher(Role::Viewer, Role::Admin));
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
