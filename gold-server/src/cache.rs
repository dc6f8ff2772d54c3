//! Single-slot price cache with a fixed time-to-live.

use crate::price::PriceSet;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// How long a stored [`PriceSet`] is served before the upstream is asked again.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// The stored price set together with the moment it was stored.
#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    pub prices: PriceSet,
    pub fetched_at: Instant,
    pub fetched_at_utc: DateTime<Utc>,
}

#[derive(Debug)]
pub struct PriceCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    /// An entry is valid while less than `ttl` has elapsed since it was stored.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        self.entry
            .is_some_and(|e| now.saturating_duration_since(e.fetched_at) < self.ttl)
    }

    /// Returns the entry if it is still valid at `now`.
    pub fn get_at(&self, now: Instant) -> Option<CacheEntry> {
        self.entry.filter(|_| self.is_valid_at(now))
    }

    /// Replaces the slot with `prices`, stamped with one captured moment.
    pub fn store(&mut self, prices: PriceSet, now: Instant, now_utc: DateTime<Utc>) {
        self.entry = Some(CacheEntry {
            prices,
            fetched_at: now,
            fetched_at_utc: now_utc,
        });
    }
}
