//! `greenlight-workspace` — workspace and membership lifecycle.
//!
//! A workspace is the tenant boundary: it owns members (each with one role),
//! invitations, and the per-workspace approval workflow settings. The
//! [`WorkspaceDirectory`] service is the only mutation path.

pub mod directory;
pub mod invitation;
pub mod store;
pub mod workspace;

pub use directory::{DirectoryError, UserContext, WorkspaceDirectory, WorkspaceMembership};
pub use invitation::{Invitation, InvitationStatus};
pub use store::{InMemoryWorkspaceStore, WorkspaceStore, WorkspaceStoreError};
pub use workspace::{ApprovalWorkflowSettings, Member, Workspace};
