//! `greenlight-resource` — approvable resources and their lifecycle types.
//!
//! Pure domain: the status machine, the resource aggregate, and the immutable
//! audit records that hang off it. All state mutation goes through
//! [`ApprovableResource`]'s methods; persistence lives elsewhere.

pub mod comment;
pub mod history;
pub mod resource;
pub mod status;

pub use comment::Comment;
pub use history::{Actor, StatusChange};
pub use resource::{ApprovableResource, ResourcePayload};
pub use status::{ApprovalAction, ApprovalStatus};
