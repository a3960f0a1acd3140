//! Periodic deletion of old authorizations.
//!
//! Authorizations (with their attendance and stored documents) are kept for
//! a limited time after submission. Runs once a day using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use autoriza_core::types::Timestamp;
use autoriza_db::repositories::AuthorizationRepo;
use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::background::MaintenanceError;
use crate::storage::FileStore;

/// How often the retention job runs.
const RETENTION_INTERVAL: Duration = Duration::from_secs(24 * 3600);

/// Delete every authorization submitted before `now - retention_days`
/// and remove its stored document.
///
/// Returns the number of deleted authorizations, with or without a document.
pub async fn purge_expired(
    pool: &PgPool,
    file_store: &FileStore,
    retention_days: i64,
    now: Timestamp,
) -> Result<usize, MaintenanceError> {
    let cutoff = now - chrono::Duration::days(retention_days);
    let deleted = AuthorizationRepo::delete_older_than(pool, cutoff).await?;
    for reference in deleted.iter().filter_map(|(_, r)| r.as_deref()) {
        file_store.delete_quietly(reference).await;
    }
    Ok(deleted.len())
}

/// Run the retention loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    file_store: Arc<FileStore>,
    retention_days: i64,
    cancel: CancellationToken,
) {
    tracing::info!(
        retention_days,
        interval_secs = RETENTION_INTERVAL.as_secs(),
        "Retention job started"
    );

    let mut interval = tokio::time::interval(RETENTION_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match purge_expired(&pool, &file_store, retention_days, Utc::now()).await {
                    Ok(0) => tracing::debug!("Retention: nothing to purge"),
                    Ok(deleted) => {
                        tracing::info!(deleted, "Retention: purged old authorizations");
                    }
                    Err(e) => tracing::error!(error = %e, "Retention: cleanup failed"),
                }
            }
        }
    }
}
