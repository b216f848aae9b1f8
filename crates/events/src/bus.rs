//! In-process notification bus: a per-job subscriber registry.
//!
//! [`NotificationBus`] maps job ids to the set of currently-listening
//! subscribers. It is designed to be shared via `Arc<NotificationBus>`
//! across the application. The registry is empty at process start and
//! entries exist only between `subscribe` and `unsubscribe` — delivery
//! is best-effort, not a durability guarantee.
//!
//! Each subscriber owns an unbounded mpsc receiver, so `publish` never
//! blocks and one subscriber's fate never affects another's delivery.
//! Per-job FIFO ordering follows from the channel: messages published
//! for a job arrive at each of its subscribers in publish order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, RwLock};

use crate::notification::JobNotification;

/// Receiver half handed to a subscriber.
pub type NotificationReceiver = mpsc::UnboundedReceiver<JobNotification>;

/// Opaque handle identifying one subscription, required for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    sender: mpsc::UnboundedSender<JobNotification>,
}

/// Per-job publish/subscribe registry.
pub struct NotificationBus {
    subscribers: RwLock<HashMap<String, Vec<Subscriber>>>,
    next_id: AtomicU64,
}

impl NotificationBus {
    /// Create a new, empty bus.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a subscriber for one job.
    ///
    /// Multiple subscribers per job are supported (e.g. two browser tabs
    /// watching the same job). Returns the handle needed to unsubscribe
    /// and the receiver to read notifications from.
    pub async fn subscribe(&self, job_id: &str) -> (SubscriptionId, NotificationReceiver) {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .write()
            .await
            .entry(job_id.to_string())
            .or_default()
            .push(Subscriber { id, sender: tx });
        (id, rx)
    }

    /// Remove a subscription. Removing one that is already gone is a
    /// no-op, never an error.
    pub async fn unsubscribe(&self, job_id: &str, id: SubscriptionId) {
        let mut map = self.subscribers.write().await;
        if let Some(subs) = map.get_mut(job_id) {
            subs.retain(|s| s.id != id);
            if subs.is_empty() {
                map.remove(job_id);
            }
        }
    }

    /// Deliver a notification to every current subscriber of the job.
    ///
    /// A subscriber whose receiver has been dropped is skipped; it will
    /// be removed when its connection unsubscribes. Delivery to one
    /// subscriber can never abort delivery to the others.
    pub async fn publish(&self, job_id: &str, notification: JobNotification) {
        let map = self.subscribers.read().await;
        let Some(subs) = map.get(job_id) else {
            return;
        };
        for sub in subs {
            if sub.sender.send(notification.clone()).is_err() {
                tracing::debug!(job_id, subscription = sub.id.0, "Subscriber channel closed");
            }
        }
    }

    /// Number of live subscribers for a job. Used by tests and metrics.
    pub async fn subscriber_count(&self, job_id: &str) -> usize {
        self.subscribers
            .read()
            .await
            .get(job_id)
            .map_or(0, |subs| subs.len())
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
