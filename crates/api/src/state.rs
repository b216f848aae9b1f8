use std::sync::Arc;

use scrybe_events::NotificationBus;
use scrybe_pipeline::JobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: scrybe_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Job Store: all job state transitions go through this.
    pub jobs: JobStore,
    /// Notification bus shared between the Job Store and the real-time
    /// gateway sessions.
    pub bus: Arc<NotificationBus>,
}

impl AppState {
    pub fn new(pool: scrybe_db::DbPool, config: ServerConfig) -> Self {
        let bus = Arc::new(NotificationBus::new());
        let jobs = JobStore::new(pool.clone(), Arc::clone(&bus));
        Self {
            pool,
            config: Arc::new(config),
            jobs,
            bus,
        }
    }
}
