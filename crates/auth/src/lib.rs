//! `greenlight-auth` — pure role-based authorization boundary.
//!
//! This crate is intentionally decoupled from storage and transport. It knows
//! nothing about workspaces or members; membership resolution happens one
//! layer up. Everything here is immutable data plus pure functions, safe to
//! share across threads without synchronization.

pub mod action;
pub mod authorizer;
pub mod permission;
pub mod role;

pub use action::ResourceAction;
pub use authorizer::{PermissionCheck, RoleAuthorizer};
pub use permission::{PermissionRule, PermissionTable};
pub use role::Role;
