use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use skycache::{CacheEntry, Clock, LocationKey, SystemClock, WeatherCache, WeatherPayload};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Per-entry expiry policy: each entry lives for the TTL it was stored with,
/// and an overwrite restarts the countdown.
pub struct CacheExpiry;

impl Expiry<String, CacheEntry> for CacheExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.time_to_live())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.time_to_live())
    }
}

/// Moka-based weather cache with per-entry TTL
///
/// Moka reclaims memory once an entry's TTL elapses on the wall clock. Whether
/// an entry is still served is decided against the injected `Clock`, so TTL
/// boundaries can be tested without waiting.
pub struct MokaWeatherCache {
    cache: Cache<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl MokaWeatherCache {
    /// Create an unbounded cache on the system clock
    pub fn new_unbounded() -> Self {
        Self::new(None, Arc::new(SystemClock))
    }

    /// Create a cache with an optional entry bound
    pub fn new(max_entries: Option<u64>, clock: Arc<dyn Clock>) -> Self {
        let mut builder = Cache::builder()
            .name("weather")
            .expire_after(CacheExpiry);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
            clock,
        }
    }

    /// Flush moka's pending maintenance so `entry_count` is exact
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl WeatherCache for MokaWeatherCache {
    async fn get(&self, key: &LocationKey) -> Option<WeatherPayload> {
        let entry = self.cache.get(key.as_str()).await?;

        if entry.is_fresh(self.clock.now()) {
            Some(entry.payload)
        } else {
            debug!("Entry for {} expired at {}", key, entry.expires_at);
            None
        }
    }

    async fn set(&self, key: &LocationKey, payload: WeatherPayload, ttl: Duration) {
        let entry = CacheEntry::new(payload, self.clock.now(), ttl);
        self.cache.insert(key.as_str().to_string(), entry).await;
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Debug for MokaWeatherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaWeatherCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
