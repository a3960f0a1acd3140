//! Removal of uploaded files that no authorization points at.
//!
//! A file can outlive its row when a database write fails after the upload
//! was stored, or when a file deletion fails after its row was removed.
//! Files younger than the grace period are skipped so an upload whose row
//! is still being written is never touched.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use autoriza_db::repositories::AuthorizationRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::background::MaintenanceError;
use crate::storage::FileStore;

/// How often the orphan scan runs.
const SCAN_INTERVAL: Duration = Duration::from_secs(3600);

/// Delete unreferenced files last modified before `now - grace`.
///
/// Returns the number of files removed.
pub async fn remove_orphans(
    pool: &PgPool,
    file_store: &FileStore,
    grace: Duration,
    now: SystemTime,
) -> Result<usize, MaintenanceError> {
    let entries = file_store.list_references().await?;
    if entries.is_empty() {
        return Ok(0);
    }

    let referenced: HashSet<String> = AuthorizationRepo::all_file_references(pool)
        .await?
        .into_iter()
        .collect();

    let mut removed = 0;
    for entry in entries {
        if referenced.contains(&entry.reference) {
            continue;
        }
        let age = now.duration_since(entry.modified).unwrap_or_default();
        if age < grace {
            continue;
        }
        if file_store.delete(&entry.reference).await? {
            tracing::debug!(reference = %entry.reference, "Removed orphaned upload");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Run the orphan scan loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    file_store: Arc<FileStore>,
    grace_mins: i64,
    cancel: CancellationToken,
) {
    let grace = Duration::from_secs(grace_mins.max(0) as u64 * 60);
    tracing::info!(
        grace_mins,
        interval_secs = SCAN_INTERVAL.as_secs(),
        "Orphan file job started"
    );

    let mut interval = tokio::time::interval(SCAN_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Orphan file job stopping");
                break;
            }
            _ = interval.tick() => {
                match remove_orphans(&pool, &file_store, grace, SystemTime::now()).await {
                    Ok(0) => tracing::debug!("Orphan files: nothing to remove"),
                    Ok(removed) => tracing::info!(removed, "Orphan files: removed"),
                    Err(e) => tracing::error!(error = %e, "Orphan files: scan failed"),
                }
            }
        }
    }
}
