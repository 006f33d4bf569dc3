//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, whether
//! or not anyone reads them again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a task that calls [`prune`](crate::cache::CacheStore::prune) every `interval`.
///
/// The task lives until the returned handle is aborted, which the server
/// does during graceful shutdown. The write lock is held only for the sweep
/// itself.
///
/// # Example
/// ```ignore
/// let cache = CacheStore::default().shared();
/// let prune_handle = spawn_prune_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// prune_handle.abort();
/// ```
pub fn spawn_prune_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache prune task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.prune();

            if removed > 0 {
                info!("Cache prune: removed {} expired entries", removed);
            } else {
                debug!("Cache prune: no expired entries found");
            }
        }
    })
}
