//! `greenlight-store` — resource persistence abstraction.
//!
//! Any durable key-value or document store satisfies this contract provided
//! it offers atomic per-resource read-modify-write and supports the filter
//! fields in [`ResourceFilter`]. The in-memory implementation is the
//! reference for tests/dev.

pub mod filter;
pub mod in_memory;
pub mod r#trait;

pub use filter::ResourceFilter;
pub use in_memory::InMemoryResourceStore;
pub use r#trait::{ResourceStore, StoreError};
