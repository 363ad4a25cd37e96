//! Aggregate statistics over a set of resources.

use std::collections::HashMap;

use greenlight_core::ResourceType;
use greenlight_resource::{ApprovableResource, ApprovalStatus};
use serde::Serialize;

/// Counts and rates computed over one resource listing.
///
/// All figures derive from the slice passed to [`compute`](Self::compute);
/// apply a filter first to scope them to a workspace or type.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ApprovalStatistics {
    pub total: usize,
    pub by_status: HashMap<ApprovalStatus, usize>,
    pub by_resource_type: HashMap<ResourceType, usize>,
    pub by_app: HashMap<String, usize>,
    /// Mean seconds from submission to approval, over resources that carry
    /// both timestamps. `None` when no resource qualifies.
    pub avg_time_to_approval_secs: Option<f64>,
    /// `approved / (approved + rejected) * 100`, or `0.0` when nothing has
    /// been decided yet.
    pub approval_rate: f64,
}

impl ApprovalStatistics {
    pub fn compute(resources: &[ApprovableResource]) -> Self {
        let mut by_status: HashMap<ApprovalStatus, usize> = HashMap::new();
        let mut by_resource_type: HashMap<ResourceType, usize> = HashMap::new();
        let mut by_app: HashMap<String, usize> = HashMap::new();
        let mut approval_durations_secs: Vec<f64> = Vec::new();

        for resource in resources {
            *by_status.entry(resource.approval_status).or_default() += 1;
            *by_resource_type.entry(resource.resource_type()).or_default() += 1;
            if let Some(app_id) = resource.payload.app_id() {
                *by_app.entry(app_id.to_string()).or_default() += 1;
            }
            if let (Some(submitted), Some(approved)) =
                (resource.submitted_for_review_at, resource.approved_at)
            {
                let millis = (approved - submitted).num_milliseconds();
                approval_durations_secs.push(millis as f64 / 1000.0);
            }
        }

        let avg_time_to_approval_secs = if approval_durations_secs.is_empty() {
            None
        } else {
            Some(
                approval_durations_secs.iter().sum::<f64>()
                    / approval_durations_secs.len() as f64,
            )
        };

        let approved = by_status
            .get(&ApprovalStatus::Approved)
            .copied()
            .unwrap_or(0);
        let rejected = by_status
            .get(&ApprovalStatus::Rejected)
            .copied()
            .unwrap_or(0);
        let decided = approved + rejected;
        let approval_rate = if decided == 0 {
            0.0
        } else {
            approved as f64 / decided as f64 * 100.0
        };

        Self {
            total: resources.len(),
            by_status,
            by_resource_type,
            by_app,
            avg_time_to_approval_secs,
            approval_rate,
        }
    }
}
