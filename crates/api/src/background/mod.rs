//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept a [`CancellationToken`]
//! for graceful shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod orphan_files;
pub mod retention;

use crate::storage::StorageError;

/// Failure of one maintenance pass. The loops log it and try again on the
/// next tick.
#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
