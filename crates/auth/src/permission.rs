//! Data-driven permission table.
//!
//! Authorization stays declarative: a role maps to a list of rules, and a
//! request is satisfied by any rule whose action matches (or is the `Manage`
//! wildcard) and whose resource type matches (or is unrestricted). No
//! inheritance hierarchies; the table is the whole policy.

use greenlight_core::ResourceType;
use serde::{Deserialize, Serialize};

use crate::{ResourceAction, Role};

/// A single grant: this action, on this resource type (or any).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    /// `None` means the rule applies to every resource type.
    pub resource_type: Option<ResourceType>,
    pub action: ResourceAction,
}

impl PermissionRule {
    pub const fn any_type(action: ResourceAction) -> Self {
        Self {
            resource_type: None,
            action,
        }
    }

    pub const fn typed(resource_type: ResourceType, action: ResourceAction) -> Self {
        Self {
            resource_type: Some(resource_type),
            action,
        }
    }

    /// Whether this rule satisfies a request for `(resource_type, action)`.
    pub fn satisfies(&self, resource_type: ResourceType, action: ResourceAction) -> bool {
        let type_ok = match self.resource_type {
            None => true,
            Some(t) => t == resource_type,
        };
        let action_ok = self.action == action || self.action == ResourceAction::Manage;
        type_ok && action_ok
    }
}

/// Immutable role → rules mapping.
///
/// Construct once (usually via [`PermissionTable::standard`]) and share; the
/// table has no interior mutability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTable {
    entries: Vec<(Role, Vec<PermissionRule>)>,
}

impl PermissionTable {
    pub fn new(entries: Vec<(Role, Vec<PermissionRule>)>) -> Self {
        Self { entries }
    }

    /// The default policy.
    ///
    /// - Viewer: view and comment, any resource type.
    /// - Editor: everything a Viewer can, plus create/edit/submit/revert.
    /// - Admin / Owner: wildcard `manage` on every resource type.
    pub fn standard() -> Self {
        use ResourceAction::*;

        Self::new(vec![
            (
                Role::Viewer,
                vec![PermissionRule::any_type(View), PermissionRule::any_type(Comment)],
            ),
            (
                Role::Editor,
                vec![
                    PermissionRule::any_type(View),
                    PermissionRule::any_type(Comment),
                    PermissionRule::any_type(Create),
                    PermissionRule::any_type(Edit),
                    PermissionRule::any_type(SubmitForReview),
                    PermissionRule::any_type(RevertToDraft),
                ],
            ),
            (Role::Admin, vec![PermissionRule::any_type(Manage)]),
            (Role::Owner, vec![PermissionRule::any_type(Manage)]),
        ])
    }

    pub fn rules_for(&self, role: Role) -> &[PermissionRule] {
        self.entries
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `role` may perform `action` on `resource_type`.
    pub fn allows(&self, role: Role, resource_type: ResourceType, action: ResourceAction) -> bool {
        self.rules_for(role)
            .iter()
            .any(|rule| rule.satisfies(resource_type, action))
    }

    /// Minimum role (ascending hierarchy scan) that satisfies the request.
    pub fn min_role_for(
        &self,
        resource_type: ResourceType,
        action: ResourceAction,
    ) -> Option<Role> {
        Role::ASCENDING
            .into_iter()
            .find(|role| self.allows(*role, resource_type, action))
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_wildcard_satisfies_any_action() {
        let table = PermissionTable::standard();
        for action in [
            ResourceAction::View,
            ResourceAction::Approve,
            ResourceAction::Delete,
            ResourceAction::SubmitForReview,
        ] {
            assert!(table.allows(Role::Admin, ResourceType::Ad, action));
            assert!(table.allows(Role::Owner, ResourceType::Screenshot, action));
        }
    }

    #[test]
    fn viewer_cannot_submit_or_approve() {
        let table = PermissionTable::standard();
        assert!(table.allows(Role::Viewer, ResourceType::Ad, ResourceAction::View));
        assert!(!table.allows(Role::Viewer, ResourceType::Ad, ResourceAction::SubmitForReview));
        assert!(!table.allows(Role::Viewer, ResourceType::Ad, ResourceAction::Approve));
    }

    #[test]
    fn editor_can_submit_but_not_approve() {
        let table = PermissionTable::standard();
        assert!(table.allows(
            Role::Editor,
            ResourceType::CustomProductPage,
            ResourceAction::SubmitForReview
        ));
        assert!(!table.allows(Role::Editor, ResourceType::Campaign, ResourceAction::Approve));
    }

    #[test]
    fn min_role_scans_ascending() {
        let table = PermissionTable::standard();
        assert_eq!(
            table.min_role_for(ResourceType::Ad, ResourceAction::View),
            Some(Role::Viewer)
        );
        assert_eq!(
            table.min_role_for(ResourceType::Ad, ResourceAction::SubmitForReview),
            Some(Role::Editor)
        );
        assert_eq!(
            table.min_role_for(ResourceType::Ad, ResourceAction::Approve),
            Some(Role::Admin)
        );
    }

    #[test]
    fn typed_rule_is_scoped_to_its_resource_type() {
        let table = PermissionTable::new(vec![(
            Role::Editor,
            vec![PermissionRule::typed(
                ResourceType::Screenshot,
                ResourceAction::Edit,
            )],
        )]);
        assert!(table.allows(Role::Editor, ResourceType::Screenshot, ResourceAction::Edit));
        assert!(!table.allows(Role::Editor, ResourceType::Ad, ResourceAction::Edit));
    }
}
