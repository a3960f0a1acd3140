use std::sync::Arc;

use autoriza_events::NotificationBus;

use crate::config::ServerConfig;
use crate::storage::FileStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: autoriza_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Storage for uploaded permission documents.
    pub file_store: Arc<FileStore>,
    /// Handlers publish here after their write commits; the dispatcher sends
    /// the emails.
    pub notifications: Arc<NotificationBus>,
}
