use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Error, Result};
use std::fmt;
use std::time::Duration;

pub const CACHE_KEY_PREFIX: &str = "weather_data:";

/// A validated location plus its normalized cache key.
///
/// Keys are lowercased, trimmed, and have every whitespace run collapsed to a
/// single `_`, so `"New York"` and `"  new   york "` share one cache entry.
/// The original string is kept untouched for the upstream request.
#[derive(Clone, Debug)]
pub struct LocationKey {
    original: String,
    key: String,
}

impl LocationKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidLocation);
        }

        let normalized = trimmed
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        Ok(Self {
            original: raw.to_string(),
            key: format!("{}{}", CACHE_KEY_PREFIX, normalized),
        })
    }

    /// Location exactly as the caller supplied it
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Provider document, forwarded verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherPayload(serde_json::Value);

impl WeatherPayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for WeatherPayload {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub payload: WeatherPayload,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(payload: WeatherPayload, stored_at: DateTime<Utc>, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| stored_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            payload,
            stored_at,
            expires_at,
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Lifetime the entry was stored with
    pub fn time_to_live(&self) -> Duration {
        (self.expires_at - self.stored_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
