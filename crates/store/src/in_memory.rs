//! In-memory resource store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use greenlight_core::{ExpectedVersion, ResourceId};
use greenlight_resource::ApprovableResource;

use crate::filter::ResourceFilter;
use crate::r#trait::{ResourceStore, StoreError};

/// In-memory resource store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    resources: RwLock<HashMap<ResourceId, ApprovableResource>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Storage("lock poisoned".to_string())
    }
}

impl ResourceStore for InMemoryResourceStore {
    fn get(&self, id: ResourceId) -> Result<Option<ApprovableResource>, StoreError> {
        let map = self.resources.read().map_err(|_| Self::poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn save(
        &self,
        mut resource: ApprovableResource,
        expected: ExpectedVersion,
    ) -> Result<ApprovableResource, StoreError> {
        let mut map = self.resources.write().map_err(|_| Self::poisoned())?;

        let current = map.get(&resource.id).map(|r| r.version).unwrap_or(0);
        if !expected.matches(current) {
            return Err(StoreError::Conflict(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        resource.version = current + 1;
        resource.updated_at = Utc::now();
        map.insert(resource.id, resource.clone());
        Ok(resource)
    }

    fn list(&self, filter: &ResourceFilter) -> Result<Vec<ApprovableResource>, StoreError> {
        let map = self.resources.read().map_err(|_| Self::poisoned())?;
        let mut out: Vec<ApprovableResource> =
            map.values().filter(|r| filter.matches(r)).cloned().collect();
        // Most-recently-updated first; id as a deterministic tie-breaker.
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.as_uuid().cmp(a.id.as_uuid())));
        Ok(out)
    }

    fn delete(&self, id: ResourceId) -> Result<bool, StoreError> {
        let mut map = self.resources.write().map_err(|_| Self::poisoned())?;
        Ok(map.remove(&id).is_some())
    }
}
