use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, instrument};

use super::service::SessionService;

/// Configuration for the revocation cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to sweep expired entries out of the blacklist
    pub cleanup_interval: Duration,
}

/// Starts the background task that periodically drops revoked tokens whose
/// natural expiry has passed
#[instrument(skip(session_service))]
pub async fn start_cleanup_task(session_service: Arc<SessionService>, config: CleanupConfig) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        "Starting revoked token cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;
        run_cleanup(&session_service).await;
    }
}

async fn run_cleanup(session_service: &SessionService) -> usize {
    let removed = session_service.cleanup_revoked_sessions().await;
    if removed > 0 {
        info!(removed, "Dropped expired entries from token blacklist");
    }
    removed
}
