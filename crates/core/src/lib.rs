//! `greenlight-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod resource_type;
pub mod version;

pub use error::{DomainError, DomainResult};
pub use id::{
    ChangeId, CommentId, InvitationId, NotificationId, ResourceId, UserId, WorkspaceId,
};
pub use resource_type::ResourceType;
pub use version::ExpectedVersion;
