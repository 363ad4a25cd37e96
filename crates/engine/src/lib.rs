//! `greenlight-engine` — the approval state machine.
//!
//! [`ApprovalEngine`] validates and applies status transitions, enforces
//! authorization, appends audit entries, persists through the resource
//! store, and triggers notifications. It is the only mutation path for
//! approvable resources (administrative delete aside).

pub mod engine;
pub mod error;
pub mod stats;

pub use engine::{ActionOutcome, ApprovalEngine};
pub use error::EngineError;
pub use stats::ApprovalStatistics;
