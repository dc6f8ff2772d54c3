//! Cache → fetch → fallback resolution of the served price set.

use crate::cache::PriceCache;
use crate::price::{PriceSet, FALLBACK, GRAM_FLOOR};
use crate::price_feed::{FetchError, PriceProvider};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{info, warn};

/// Why the fallback snapshot is being served.
#[derive(Debug)]
pub enum FallbackReason {
    Upstream(FetchError),
    /// The provider accepted a gram price at or below the floor.
    BelowFloor { gram: f64 },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Upstream(e) => write!(f, "upstream: {e}"),
            FallbackReason::BelowFloor { gram } => write!(f, "gram price {gram} below floor"),
        }
    }
}

/// Result of resolving the prices for one request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Freshly fetched from the upstream.
    Fresh(PriceSet),
    /// Served from the cache, stored at the given time.
    Stale(PriceSet, DateTime<Utc>),
    /// The fallback snapshot.
    Fallback(FallbackReason),
}

impl FetchOutcome {
    pub fn prices(&self) -> PriceSet {
        match self {
            FetchOutcome::Fresh(p) | FetchOutcome::Stale(p, _) => *p,
            FetchOutcome::Fallback(_) => FALLBACK,
        }
    }
}

/// Owns the price cache and the upstream provider.
pub struct GoldPriceService {
    provider: Box<dyn PriceProvider>,
    cache: Mutex<PriceCache>,
}

impl GoldPriceService {
    pub fn new(provider: Box<dyn PriceProvider>) -> Self {
        Self::with_cache(provider, PriceCache::default())
    }

    pub fn with_cache(provider: Box<dyn PriceProvider>, cache: PriceCache) -> Self {
        Self {
            provider,
            cache: Mutex::new(cache),
        }
    }

    /// Serves the cached set while valid; otherwise fetches, falls back if
    /// needed and stores whatever was chosen.
    ///
    /// The cache lock is not held across the upstream call, so concurrent
    /// misses each fetch and the last store wins.
    pub async fn resolve(&self) -> FetchOutcome {
        let cached = self.lock_cache().get_at(Instant::now());
        if let Some(entry) = cached {
            info!(source = entry.prices.source.as_str(), "serving cached prices");
            return FetchOutcome::Stale(entry.prices, entry.fetched_at_utc);
        }

        info!(provider = self.provider.name(), "cache miss, calling upstream");
        let outcome = match self.provider.try_fetch().await {
            Ok(prices) if prices.gram <= GRAM_FLOOR => FetchOutcome::Fallback(
                FallbackReason::BelowFloor { gram: prices.gram },
            ),
            Ok(prices) => FetchOutcome::Fresh(prices),
            Err(e) => FetchOutcome::Fallback(FallbackReason::Upstream(e)),
        };

        if let FetchOutcome::Fallback(reason) = &outcome {
            warn!("using fallback prices ({reason})");
        }

        self.lock_cache().store(outcome.prices(), Instant::now(), Utc::now());
        outcome
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, PriceCache> {
        // The slot is only ever replaced whole, so a poisoned guard is still consistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::PriceSource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct StubProvider {
        result: fn() -> Result<PriceSet, FetchError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PriceProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn try_fetch(&self) -> Result<PriceSet, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn live() -> Result<PriceSet, FetchError> {
        Ok(PriceSet {
            gram: 5600.5,
            quarter_coin: 8900.0,
            half_coin: 17800.0,
            full_coin: 35600.0,
            ounce: 172000.0,
            source: PriceSource::Upstream("stub"),
        })
    }

    fn service(
        result: fn() -> Result<PriceSet, FetchError>,
        ttl: Duration,
    ) -> (GoldPriceService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = StubProvider {
            result,
            calls: calls.clone(),
        };
        (
            GoldPriceService::with_cache(Box::new(provider), PriceCache::new(ttl)),
            calls,
        )
    }

    #[tokio::test]
    async fn test_fresh_then_cached() {
        let (svc, calls) = service(live, Duration::from_secs(300));

        let first = svc.resolve().await;
        assert!(matches!(first, FetchOutcome::Fresh(_)));

        let before = Utc::now();
        let second = svc.resolve().await;
        assert!(matches!(second, FetchOutcome::Stale(_, cached_at) if cached_at <= before));
        assert_eq!(first.prices(), second.prices());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_error_falls_back_and_is_cached() {
        let (svc, calls) = service(
            || Err(FetchError::Malformed("boom".into())),
            Duration::from_secs(300),
        );

        let first = svc.resolve().await;
        assert!(matches!(
            first,
            FetchOutcome::Fallback(FallbackReason::Upstream(_))
        ));
        assert_eq!(first.prices(), FALLBACK);

        let second = svc.resolve().await;
        assert!(matches!(second, FetchOutcome::Stale(p, _) if p == FALLBACK));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gram_at_floor_is_rechecked() {
        let (svc, _) = service(
            || {
                Ok(PriceSet {
                    gram: 5000.0,
                    ..live().unwrap()
                })
            },
            Duration::from_secs(300),
        );

        let outcome = svc.resolve().await;
        assert!(matches!(
            outcome,
            FetchOutcome::Fallback(FallbackReason::BelowFloor { gram }) if gram == 5000.0
        ));
        assert_eq!(outcome.prices().source, PriceSource::Fallback);
    }

    #[tokio::test]
    async fn test_expired_cache_fetches_again() {
        let (svc, calls) = service(live, Duration::ZERO);

        svc.resolve().await;
        let again = svc.resolve().await;
        assert!(matches!(again, FetchOutcome::Fresh(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
