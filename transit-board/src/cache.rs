//! Caching layer for timetable expansion.
//!
//! Expanding a line only depends on its timetable and the calendar date,
//! but the board is rebuilt every few seconds. Expansions are cached per
//! (line position, date, day bucket, snapshot generation); a schedule reload bumps the
//! generation, so entries for replaced data are never read again and age
//! out through the TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use moka::future::Cache as MokaCache;

use crate::domain::{DayBucket, LineSchedule};
use crate::engine::{Board, EngineConfig, expand_schedule};
use crate::source::ScheduleStore;

/// Cache key: (line position in the snapshot, service date, bucket, snapshot generation).
///
/// Position rather than line id, since nothing stops a feed from reusing
/// an id for two records.
type ExpansionKey = (usize, NaiveDate, DayBucket, u64);

/// Cached expansion of one line on one date.
type ExpansionEntry = Arc<Vec<NaiveDateTime>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Schedule store with cached expansion.
///
/// Cheap to clone; clones share the store and the cache.
#[derive(Clone)]
pub struct CachedSchedules {
    store: ScheduleStore,
    expansions: MokaCache<ExpansionKey, ExpansionEntry>,
}

impl CachedSchedules {
    /// Create a new cached view over a store.
    pub fn new(store: ScheduleStore, config: &CacheConfig) -> Self {
        let expansions = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { store, expansions }
    }

    /// Access the underlying store, e.g. to reload it.
    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    /// Build the ranked board for `now` from the current snapshot.
    pub async fn board_at(&self, now: NaiveDateTime, config: &EngineConfig) -> Board {
        let snapshot = self.store.snapshot().await;
        let date = now.date();
        let bucket = DayBucket::for_date(date, config.bucket_scheme);

        let mut expanded = Vec::with_capacity(snapshot.lines.len());
        for (position, line) in snapshot.lines.iter().enumerate() {
            let key = (position, date, bucket, snapshot.generation);
            expanded.push(self.instants(key, line, config).await);
        }

        Board::assemble(
            snapshot
                .lines
                .iter()
                .zip(expanded.iter().map(|e| e.as_slice())),
            now,
            config,
        )
    }

    async fn instants(
        &self,
        key: ExpansionKey,
        line: &Arc<LineSchedule>,
        config: &EngineConfig,
    ) -> ExpansionEntry {
        let date = key.1;
        let scheme = config.bucket_scheme;
        self.expansions
            .get_with(key, async move { Arc::new(expand_schedule(line, date, scheme)) })
            .await
    }

    /// Get cache statistics (for monitoring).
    pub fn cache_entry_count(&self) -> u64 {
        self.expansions.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.expansions.invalidate_all();
    }
}
