use std::time::Duration;

use tracing::{error, info};

use juniper_database::Database;
use juniper_database::impls::cases::{CASE_RETENTION_SECS, delete_cases_before};
use juniper_utils::time::now_unix_secs;

const SWEEP_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Periodically drop moderation cases past the 30-day retention window.
/// This is the only path that ever deletes a case.
pub fn spawn_case_retention_sweep(db: Database) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;

            let cutoff = now_unix_secs().saturating_sub(CASE_RETENTION_SECS);
            match delete_cases_before(&db, cutoff).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "case retention sweep removed expired cases"),
                Err(source) => error!(?source, "case retention sweep failed"),
            }
        }
    });
}
