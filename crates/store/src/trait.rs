//! Resource store contract.

use std::sync::Arc;

use greenlight_core::{ExpectedVersion, ResourceId};
use greenlight_resource::ApprovableResource;
use thiserror::Error;

use crate::filter::ResourceFilter;

/// Resource store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency check failed (version mismatch).
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    /// Underlying persistence failure.
    #[error("storage failure: {0}")]
    Storage(String),

    /// A bounded store operation exceeded its deadline.
    #[error("operation timed out: {0}")]
    Timeout(String),
}

/// Persistence abstraction for approvable resources.
///
/// ## Save semantics
///
/// `save()` is an upsert of the whole record:
/// - checks `expected` against the currently persisted version (missing
///   records count as version 0) and rejects stale writes with
///   [`StoreError::Conflict`];
/// - stamps `updated_at` and bumps `version` on the stored copy;
/// - is all-or-nothing: a failed save leaves the prior record untouched.
///
/// ## List semantics
///
/// `list()` returns matches sorted most-recently-updated first.
pub trait ResourceStore: Send + Sync {
    fn get(&self, id: ResourceId) -> Result<Option<ApprovableResource>, StoreError>;

    /// Upsert; returns the stored copy (with bumped version and fresh
    /// `updated_at`).
    fn save(
        &self,
        resource: ApprovableResource,
        expected: ExpectedVersion,
    ) -> Result<ApprovableResource, StoreError>;

    fn list(&self, filter: &ResourceFilter) -> Result<Vec<ApprovableResource>, StoreError>;

    /// Administrative delete; bypasses the state machine. Returns whether a
    /// record was removed.
    fn delete(&self, id: ResourceId) -> Result<bool, StoreError>;
}

impl<S> ResourceStore for Arc<S>
where
    S: ResourceStore + ?Sized,
{
    fn get(&self, id: ResourceId) -> Result<Option<ApprovableResource>, StoreError> {
        (**self).get(id)
    }

    fn save(
        &self,
        resource: ApprovableResource,
        expected: ExpectedVersion,
    ) -> Result<ApprovableResource, StoreError> {
        (**self).save(resource, expected)
    }

    fn list(&self, filter: &ResourceFilter) -> Result<Vec<ApprovableResource>, StoreError> {
        (**self).list(filter)
    }

    fn delete(&self, id: ResourceId) -> Result<bool, StoreError> {
        (**self).delete(id)
    }
}
