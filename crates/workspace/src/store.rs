//! Workspace persistence abstraction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use greenlight_core::{InvitationId, UserId, WorkspaceId};
use thiserror::Error;

use crate::invitation::Invitation;
use crate::workspace::Workspace;

/// Workspace store operation error (infrastructure, not domain).
#[derive(Debug, Error)]
pub enum WorkspaceStoreError {
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Durable home for workspaces and their invitations.
///
/// Implementations must make `save` an atomic whole-record upsert so
/// multi-field mutations (ownership transfer in particular) are never
/// partially visible.
pub trait WorkspaceStore: Send + Sync {
    fn get(&self, id: WorkspaceId) -> Result<Option<Workspace>, WorkspaceStoreError>;

    /// Upsert the full workspace record.
    fn save(&self, workspace: Workspace) -> Result<(), WorkspaceStoreError>;

    /// All workspaces in which `user_id` is a member.
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Workspace>, WorkspaceStoreError>;

    fn save_invitation(&self, invitation: Invitation) -> Result<(), WorkspaceStoreError>;

    fn invitation(&self, id: InvitationId) -> Result<Option<Invitation>, WorkspaceStoreError>;

    fn invitation_by_token(&self, token: &str)
    -> Result<Option<Invitation>, WorkspaceStoreError>;

    /// Invitations belonging to a workspace, newest first.
    fn invitations_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Invitation>, WorkspaceStoreError>;
}

impl<S> WorkspaceStore for Arc<S>
where
    S: WorkspaceStore + ?Sized,
{
    fn get(&self, id: WorkspaceId) -> Result<Option<Workspace>, WorkspaceStoreError> {
        (**self).get(id)
    }

    fn save(&self, workspace: Workspace) -> Result<(), WorkspaceStoreError> {
        (**self).save(workspace)
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Workspace>, WorkspaceStoreError> {
        (**self).list_for_user(user_id)
    }

    fn save_invitation(&self, invitation: Invitation) -> Result<(), WorkspaceStoreError> {
        (**self).save_invitation(invitation)
    }

    fn invitation(&self, id: InvitationId) -> Result<Option<Invitation>, WorkspaceStoreError> {
        (**self).invitation(id)
    }

    fn invitation_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Invitation>, WorkspaceStoreError> {
        (**self).invitation_by_token(token)
    }

    fn invitations_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Invitation>, WorkspaceStoreError> {
        (**self).invitations_for_workspace(workspace_id)
    }
}

/// In-memory workspace store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryWorkspaceStore {
    workspaces: RwLock<HashMap<WorkspaceId, Workspace>>,
    invitations: RwLock<HashMap<InvitationId, Invitation>>,
}

impl InMemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> WorkspaceStoreError {
        WorkspaceStoreError::Storage("lock poisoned".to_string())
    }
}

impl WorkspaceStore for InMemoryWorkspaceStore {
    fn get(&self, id: WorkspaceId) -> Result<Option<Workspace>, WorkspaceStoreError> {
        let map = self.workspaces.read().map_err(|_| Self::poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn save(&self, workspace: Workspace) -> Result<(), WorkspaceStoreError> {
        let mut map = self.workspaces.write().map_err(|_| Self::poisoned())?;
        map.insert(workspace.id, workspace);
        Ok(())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Workspace>, WorkspaceStoreError> {
        let map = self.workspaces.read().map_err(|_| Self::poisoned())?;
        let mut out: Vec<Workspace> = map
            .values()
            .filter(|ws| ws.is_member(user_id))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    fn save_invitation(&self, invitation: Invitation) -> Result<(), WorkspaceStoreError> {
        let mut map = self.invitations.write().map_err(|_| Self::poisoned())?;
        map.insert(invitation.id, invitation);
        Ok(())
    }

    fn invitation(&self, id: InvitationId) -> Result<Option<Invitation>, WorkspaceStoreError> {
        let map = self.invitations.read().map_err(|_| Self::poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn invitation_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Invitation>, WorkspaceStoreError> {
        let map = self.invitations.read().map_err(|_| Self::poisoned())?;
        Ok(map.values().find(|i| i.token == token).cloned())
    }

    fn invitations_for_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<Invitation>, WorkspaceStoreError> {
        let map = self.invitations.read().map_err(|_| Self::poisoned())?;
        let mut out: Vec<Invitation> = map
            .values()
            .filter(|i| i.workspace_id == workspace_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use greenlight_auth::Role;

    #[test]
    fn save_and_get_round_trip() {
        let store = InMemoryWorkspaceStore::new();
        let ws = Workspace::create("Acme", UserId::new(), "o@acme.test", "O", Utc::now());
        let id = ws.id;
        store.save(ws.clone()).unwrap();
        assert_eq!(store.get(id).unwrap(), Some(ws));
        assert_eq!(store.get(WorkspaceId::new()).unwrap(), None);
    }

    #[test]
    fn list_for_user_filters_by_membership() {
        let store = InMemoryWorkspaceStore::new();
        let user = UserId::new();
        let mine = Workspace::create("Mine", user, "me@t.test", "Me", Utc::now());
        let other = Workspace::create("Other", UserId::new(), "x@t.test", "X", Utc::now());
        store.save(mine.clone()).unwrap();
        store.save(other).unwrap();

        let listed = store.list_for_user(user).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
    }

    #[test]
    fn invitation_lookup_by_token() {
        let store = InMemoryWorkspaceStore::new();
        let inv = Invitation::new(WorkspaceId::new(), "a@t.test", Role::Editor, Utc::now());
        let token = inv.token.clone();
        store.save_invitation(inv.clone()).unwrap();

        assert_eq!(store.invitation_by_token(&token).unwrap(), Some(inv));
        assert_eq!(store.invitation_by_token("nope").unwrap(), None);
    }
}
