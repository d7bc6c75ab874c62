use crate::domain::{LocationKey, WeatherPayload};
use async_trait::async_trait;
use shared::ServiceError;
use std::time::Duration;

// Ports are the pluggable extension points for the upstream provider and the cache backend

/// Port for the third-party weather API
#[async_trait]
pub trait WeatherProvider: Send + Sync + 'static {
    /// Fetch the provider document for `location`, forwarded as given.
    async fn fetch(&self, location: &str) -> Result<WeatherPayload, ServiceError>;
}

/// Port for the response cache
#[async_trait]
pub trait WeatherCache: Send + Sync + 'static {
    /// Absent and expired entries are both `None`.
    async fn get(&self, key: &LocationKey) -> Option<WeatherPayload>;
    /// Store `payload`, overwriting any previous entry and resetting its expiry.
    async fn set(&self, key: &LocationKey, payload: WeatherPayload, ttl: Duration);
    fn entry_count(&self) -> u64;
}
