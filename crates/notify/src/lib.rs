//! `greenlight-notify` — per-recipient notification fan-out.
//!
//! The dispatcher is a side-channel of the approval engine: one notification
//! record per relevant recipient per transition, persisted through the
//! [`NotificationStore`] abstraction.

pub mod dispatcher;
pub mod notification;
pub mod store;

pub use dispatcher::NotificationDispatcher;
pub use notification::{Notification, NotificationType};
pub use store::{InMemoryNotificationStore, NotificationStore, NotifyError};
