//! Scrybe notification infrastructure.
//!
//! This crate provides the in-process publish/subscribe layer between
//! the Job Store and real-time clients:
//!
//! - [`NotificationBus`] — per-job subscriber registry; entries exist
//!   only for the lifetime of a live subscription.
//! - [`JobNotification`] — the JSON messages delivered over the
//!   real-time channel.

pub mod bus;
pub mod notification;

pub use bus::{NotificationBus, NotificationReceiver, SubscriptionId};
pub use notification::JobNotification;
