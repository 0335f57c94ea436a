//! # Notification Delivery
//!
//! Persisted in-app notifications plus best-effort push fan-out. The
//! database row is authoritative; push delivery may silently fail.

pub mod dispatcher;
pub mod push;

pub use dispatcher::{notify_by_role, notify_user, NotificationInput};
pub use push::PushClient;
