use crate::error::{Result, WrappedError};
use crate::models::StatsRecord;
use moka::future::Cache;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process store of aggregated records keyed by username.
///
/// Entries expire one TTL after they were inserted. Once the store holds
/// `capacity` records, moka's admission and eviction policy decides which
/// ones stay. Concurrent loads of the same username share a single fetch and
/// its outcome, and failed loads are never stored.
#[derive(Clone)]
pub struct CacheStore {
    ttl: Duration,
    records: Cache<String, StatsRecord>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl CacheStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let records = Cache::builder()
            .max_capacity(capacity.max(1) as u64)
            .time_to_live(ttl)
            .build();

        Self { ttl, records }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached record if it is still fresh.
    pub async fn get(&self, username: &str) -> Option<StatsRecord> {
        self.records.get(username).await
    }

    /// Returns the fresh record for `username`, running `fetch` to load it
    /// otherwise. Callers that arrive while a load is running wait for it and
    /// receive the same record or the same error.
    pub async fn get_or_fetch<F>(&self, username: &str, fetch: F) -> Result<StatsRecord>
    where
        F: Future<Output = Result<StatsRecord>>,
    {
        self.records
            .try_get_with(username.to_string(), fetch)
            .await
            .map_err(|e| {
                debug!(username, error = %e, "Load failed, not caching");
                WrappedError::from(e)
            })
    }

    /// Number of fresh entries held.
    pub async fn len(&self) -> usize {
        self.records.run_pending_tasks().await;
        self.records.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
