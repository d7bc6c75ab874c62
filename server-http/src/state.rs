use shared::config::Config;
use skycache::{SystemClock, WeatherLookupService};
use std::sync::Arc;
use storage_engine::MokaWeatherCache;
use weather_client::VisualCrossingClient;

/// Server state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub lookup: Arc<WeatherLookupService>,
}

impl AppState {
    pub fn new(lookup: WeatherLookupService) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Wire the Visual Crossing client and the moka cache from configuration
    pub fn from_config(config: &Config) -> shared::Result<Self> {
        let provider = Arc::new(VisualCrossingClient::from_config(config)?);
        let cache = Arc::new(MokaWeatherCache::new(
            config.cache_max_entries,
            Arc::new(SystemClock),
        ));

        tracing::info!(
            "Weather cache initialized (ttl: {}s, max entries: {:?})",
            config.cache_ttl.as_secs(),
            config.cache_max_entries
        );

        Ok(Self::new(WeatherLookupService::with_ttl(
            provider,
            cache,
            config.cache_ttl,
        )))
    }
}
