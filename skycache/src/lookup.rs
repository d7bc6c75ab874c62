use crate::domain::{LocationKey, WeatherPayload};
use crate::ports::{WeatherCache, WeatherProvider};
use shared::config::Config;
use shared::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Upstream,
}

#[derive(Clone, Debug)]
pub struct Lookup {
    pub payload: WeatherPayload,
    pub source: LookupSource,
}

/// Application service that answers a weather request for one location
///
/// Validates the location, consults the cache, and on a miss makes exactly one
/// upstream call, caching the payload if it succeeds. Upstream failures are
/// returned as `Error::Service` for the HTTP layer to map.
#[derive(Clone)]
pub struct WeatherLookupService {
    provider: Arc<dyn WeatherProvider>,
    cache: Arc<dyn WeatherCache>,
    ttl: Duration,
}

impl WeatherLookupService {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(Config::DEFAULT_CACHE_TTL_SECS);

    pub fn new(provider: Arc<dyn WeatherProvider>, cache: Arc<dyn WeatherCache>) -> Self {
        Self::with_ttl(provider, cache, Self::DEFAULT_TTL)
    }

    pub fn with_ttl(
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<dyn WeatherCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn cached_locations(&self) -> u64 {
        self.cache.entry_count()
    }

    pub async fn lookup(&self, location: &str) -> Result<Lookup> {
        let key = LocationKey::parse(location).inspect_err(|_| {
            warn!("Received invalid location input: {:?}", location);
        })?;

        debug!("Checking cache for key: {}", key);
        if let Some(payload) = self.cache.get(&key).await {
            info!("Cache hit for location: {}", location);
            return Ok(Lookup {
                payload,
                source: LookupSource::Cache,
            });
        }

        info!(
            "Cache miss for location: {}. Attempting to fetch from API...",
            location
        );

        let payload = self
            .provider
            .fetch(key.original())
            .await
            .inspect_err(|e| {
                error!(
                    location = %location,
                    kind = e.kind(),
                    "Weather service error: {}",
                    e
                );
            })?;

        self.cache.set(&key, payload.clone(), self.ttl).await;
        info!(
            "Cached data for {} with timeout {} seconds",
            location,
            self.ttl.as_secs()
        );

        Ok(Lookup {
            payload,
            source: LookupSource::Upstream,
        })
    }
}

impl std::fmt::Debug for WeatherLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherLookupService")
            .field("ttl", &self.ttl)
            .field("cached_locations", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared::{Error, ServiceError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        response: std::result::Result<WeatherPayload, ServiceError>,
        calls: AtomicUsize,
        locations: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn returning(response: std::result::Result<WeatherPayload, ServiceError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: AtomicUsize::new(0),
                locations: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch(&self, location: &str) -> std::result::Result<WeatherPayload, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.locations.lock().push(location.to_string());
            self.response.clone()
        }
    }

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, (WeatherPayload, Duration)>>,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl WeatherCache for MapCache {
        async fn get(&self, key: &LocationKey) -> Option<WeatherPayload> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .get(key.as_str())
                .map(|(payload, _)| payload.clone())
        }

        async fn set(&self, key: &LocationKey, payload: WeatherPayload, ttl: Duration) {
            self.entries
                .lock()
                .insert(key.as_str().to_string(), (payload, ttl));
        }

        fn entry_count(&self) -> u64 {
            self.entries.lock().len() as u64
        }
    }

    fn boston() -> WeatherPayload {
        WeatherPayload::new(serde_json::json!({
            "resolvedAddress": "Boston, MA, United States",
            "days": [{"datetime": "2026-10-18", "tempmax": 14.2}]
        }))
    }

    #[tokio::test]
    async fn test_miss_fetches_and_populates_cache() {
        let provider = StubProvider::returning(Ok(boston()));
        let cache = Arc::new(MapCache::default());
        let service = WeatherLookupService::new(provider.clone(), cache.clone());

        let lookup = service.lookup("Boston").await.unwrap();

        assert_eq!(lookup.source, LookupSource::Upstream);
        assert_eq!(lookup.payload, boston());
        assert_eq!(provider.calls(), 1);

        let entries = cache.entries.lock();
        let (cached, ttl) = entries.get("weather_data:boston").unwrap();
        assert_eq!(cached, &boston());
        assert_eq!(*ttl, Duration::from_secs(43_200));
    }

    #[tokio::test]
    async fn test_second_request_differing_in_case_is_served_from_cache() {
        let provider = StubProvider::returning(Ok(boston()));
        let cache = Arc::new(MapCache::default());
        let service = WeatherLookupService::new(provider.clone(), cache);

        let first = service.lookup("Boston").await.unwrap();
        let second = service.lookup("boston").await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(first.source, LookupSource::Upstream);
        assert_eq!(second.source, LookupSource::Cache);
        assert_eq!(
            serde_json::to_vec(&first.payload).unwrap(),
            serde_json::to_vec(&second.payload).unwrap()
        );
    }

    #[tokio::test]
    async fn test_repeated_requests_within_ttl_hit_cache() {
        let provider = StubProvider::returning(Ok(boston()));
        let service = WeatherLookupService::new(provider.clone(), Arc::new(MapCache::default()));

        for _ in 0..5 {
            let lookup = service.lookup("New York").await.unwrap();
            assert_eq!(lookup.payload, boston());
        }
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_never_calls_provider() {
        let provider = StubProvider::returning(Err(ServiceError::Timeout));
        let cache = Arc::new(MapCache::default());
        let key = LocationKey::parse("Paris").unwrap();
        cache.set(&key, boston(), Duration::from_secs(60)).await;

        let service = WeatherLookupService::new(provider.clone(), cache);
        let lookup = service.lookup("  PARIS ").await.unwrap();

        assert_eq!(lookup.source, LookupSource::Cache);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_location_short_circuits() {
        let provider = StubProvider::returning(Ok(boston()));
        let cache = Arc::new(MapCache::default());
        let service = WeatherLookupService::new(provider.clone(), cache.clone());

        for raw in ["", "   ", "\t"] {
            let result = service.lookup(raw).await;
            assert!(matches!(result, Err(Error::InvalidLocation)));
        }

        assert_eq!(provider.calls(), 0);
        assert_eq!(cache.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_receives_original_location() {
        let provider = StubProvider::returning(Ok(boston()));
        let service = WeatherLookupService::new(provider.clone(), Arc::new(MapCache::default()));

        service.lookup(" New   York ").await.unwrap();

        assert_eq!(provider.locations.lock().as_slice(), [" New   York "]);
    }

    #[tokio::test]
    async fn test_failure_is_returned_and_not_cached() {
        let provider = StubProvider::returning(Err(ServiceError::upstream_api(404, None)));
        let cache = Arc::new(MapCache::default());
        let service = WeatherLookupService::new(provider.clone(), cache.clone());

        let result = service.lookup("Atlantis").await;
        assert!(matches!(
            result,
            Err(Error::Service(ServiceError::UpstreamApi { status: 404, .. }))
        ));
        assert_eq!(cache.entry_count(), 0);

        // Failures are not remembered, so the next request goes upstream again
        let _ = service.lookup("Atlantis").await;
        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn test_default_ttl_follows_config_default() {
        assert_eq!(
            WeatherLookupService::DEFAULT_TTL,
            Duration::from_secs(Config::DEFAULT_CACHE_TTL_SECS)
        );
        assert_eq!(WeatherLookupService::DEFAULT_TTL, Duration::from_secs(12 * 3600));
    }

    #[tokio::test]
    async fn test_custom_ttl_is_passed_to_cache() {
        let provider = StubProvider::returning(Ok(boston()));
        let cache = Arc::new(MapCache::default());
        let service =
            WeatherLookupService::with_ttl(provider, cache.clone(), Duration::from_secs(300));

        service.lookup("Oslo").await.unwrap();

        let entries = cache.entries.lock();
        assert_eq!(entries.get("weather_data:oslo").unwrap().1, Duration::from_secs(300));
        assert_eq!(service.ttl(), Duration::from_secs(300));
    }
}
