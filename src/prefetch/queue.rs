//! Prefetch Queue
//!
//! Serialized background worker that warms the cache one request at a time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::fetch::{CachedFetcher, FetchOptions};
use crate::prefetch::{adjacent_months, calendar_url};

/// Default pause between two prefetch requests
pub const DEFAULT_PREFETCH_DELAY: Duration = Duration::from_millis(100);

// == Prefetch Request ==
#[derive(Debug, Clone)]
pub struct PrefetchRequest {
    pub url: String,
    pub options: FetchOptions,
}

#[derive(Debug, Default)]
struct QueueState {
    backlog: VecDeque<PrefetchRequest>,
    draining: bool,
    completed: u64,
    failed: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<QueueState>,
    idle: Notify,
}

// == Prefetch Queue ==
/// FIFO queue of speculative fetches drained by at most one worker.
///
/// The queue is Idle until [`PrefetchQueue::add`] enqueues a request, then
/// Draining until the backlog is empty again. Requests are fetched strictly
/// in submission order, one in flight at a time, with a fixed delay between
/// them. Failures are logged and dropped.
#[derive(Debug, Clone)]
pub struct PrefetchQueue {
    shared: Arc<Shared>,
    fetcher: CachedFetcher,
    delay: Duration,
}

impl PrefetchQueue {
    pub fn new(fetcher: CachedFetcher, delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            fetcher,
            delay,
        }
    }

    // == Add ==
    /// Appends a request and starts the worker if the queue was Idle.
    ///
    /// Must be called from within a tokio runtime. Returns the backlog length
    /// after enqueueing.
    pub fn add(&self, url: impl Into<String>, options: FetchOptions) -> usize {
        let request = PrefetchRequest {
            url: url.into(),
            options,
        };

        let (pending, start) = {
            let mut state = self.lock_state();
            state.backlog.push_back(request);
            let start = !state.draining;
            state.draining = true;
            (state.backlog.len(), start)
        };

        if start {
            debug!("Prefetch queue draining");
            tokio::spawn(self.clone().drain());
        }
        pending
    }

    // == Calendar ==
    /// Enqueues the calendar pages of the months before and after `year`/`month`.
    ///
    /// Returns `None` without enqueueing anything if the month is invalid.
    pub fn prefetch_adjacent_months(&self, year: i32, month: u32) -> Option<usize> {
        let mut pending = 0;
        for (year, month) in adjacent_months(year, month)? {
            pending = self.add(calendar_url(year, month), FetchOptions::default());
        }
        Some(pending)
    }

    /// Number of requests waiting to be fetched.
    pub fn pending(&self) -> usize {
        self.lock_state().backlog.len()
    }

    pub fn is_draining(&self) -> bool {
        self.lock_state().draining
    }

    /// Prefetches that completed and failed so far.
    pub fn counters(&self) -> (u64, u64) {
        let state = self.lock_state();
        (state.completed, state.failed)
    }

    // == Wait Idle ==
    /// Resolves once the queue is Idle.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.shared.idle.notified();
            if !self.is_draining() {
                return;
            }
            notified.await;
        }
    }

    async fn drain(self) {
        loop {
            let next = {
                let mut state = self.lock_state();
                let next = state.backlog.pop_front();
                if next.is_none() {
                    state.draining = false;
                }
                next
            };

            let Some(request) = next else {
                debug!("Prefetch queue idle");
                self.shared.idle.notify_waiters();
                break;
            };

            let options = request.options.use_cache(true);
            match self.fetcher.fetch(&request.url, &options).await {
                Ok(response) => {
                    debug!(
                        "Prefetched {} (from_cache={})",
                        request.url, response.from_cache
                    );
                    self.lock_state().completed += 1;
                }
                Err(err) => {
                    warn!("Prefetch failed for {}: {}", request.url, err);
                    self.lock_state().failed += 1;
                }
            }

            tokio::time::sleep(self.delay).await;
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use reqwest::Client;

    fn queue() -> PrefetchQueue {
        // No base URL, so every relative prefetch fails fast
        let fetcher = CachedFetcher::new(Client::new(), CacheStore::default().shared());
        PrefetchQueue::new(fetcher, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_new_queue_is_idle() {
        let queue = queue();
        assert!(!queue.is_draining());
        assert_eq!(queue.pending(), 0);
        queue.wait_idle().await;
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_drain() {
        let queue = queue();

        queue.add("/api/calendar/2024/4", FetchOptions::default());
        queue.add("/api/calendar/2024/6", FetchOptions::default());
        assert!(queue.is_draining());

        queue.wait_idle().await;

        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.counters(), (0, 2));
    }

    #[tokio::test]
    async fn test_prefetch_adjacent_months_rejects_invalid_month() {
        let queue = queue();
        assert_eq!(queue.prefetch_adjacent_months(2024, 13), None);
        assert!(!queue.is_draining());
    }

    #[tokio::test]
    async fn test_queue_restarts_after_idle() {
        let queue = queue();

        queue.add("/a", FetchOptions::default());
        queue.wait_idle().await;
        queue.add("/b", FetchOptions::default());
        queue.wait_idle().await;

        assert_eq!(queue.counters(), (0, 2));
    }
}
