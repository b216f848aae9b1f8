//! The Job Store: state transitions for parse/extract jobs.
//!
//! Every mutation is a durable Postgres write followed by a
//! fire-and-forget publish on the [`NotificationBus`]
//! (`scrybe_events::NotificationBus`) — a notification can never fail
//! or roll back the write it announces. Usage accounting is embedded
//! in the completion path so the usage event and the daily aggregate
//! commit atomically with the job's terminal write.

mod store;

pub use store::{JobStore, StoreError};
