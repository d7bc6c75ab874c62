use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub api_key: String,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_max_entries: Option<u64>,
}

impl Config {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
    pub const DEFAULT_BASE_URL: &str =
        "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";
    pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60 * 12; // 12 hours

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SKYCACHE_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let http_port = lookup("SKYCACHE_HTTP_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(Self::DEFAULT_HTTP_PORT);
        let api_key = lookup("VISUAL_CROSSING_API_KEY").unwrap_or_else(|| {
            warn!("VISUAL_CROSSING_API_KEY not set, upstream requests will be rejected");
            String::new()
        });
        let upstream_base_url = lookup("VISUAL_CROSSING_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        let upstream_timeout_secs = lookup("SKYCACHE_UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(Self::DEFAULT_UPSTREAM_TIMEOUT_SECS);
        let cache_ttl_secs = lookup("SKYCACHE_CACHE_TTL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(Self::DEFAULT_CACHE_TTL_SECS);
        let cache_max_entries = lookup("SKYCACHE_CACHE_MAX_ENTRIES").and_then(|v| v.parse::<u64>().ok());

        Self {
            host,
            http_port,
            api_key,
            upstream_base_url,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("http_port", &self.http_port)
            .field("api_key", &"<redacted>")
            .field("upstream_base_url", &self.upstream_base_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_max_entries", &self.cache_max_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.api_key, "");
        assert_eq!(config.upstream_base_url, Config::DEFAULT_BASE_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(43_200));
        assert_eq!(config.cache_max_entries, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SKYCACHE_HOST", "127.0.0.1"),
            ("SKYCACHE_HTTP_PORT", "9000"),
            ("VISUAL_CROSSING_API_KEY", "secret"),
            ("VISUAL_CROSSING_BASE_URL", "http://localhost:1234/timeline/"),
            ("SKYCACHE_UPSTREAM_TIMEOUT_SECS", "3"),
            ("SKYCACHE_CACHE_TTL_SECS", "60"),
            ("SKYCACHE_CACHE_MAX_ENTRIES", "500"),
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.upstream_base_url, "http://localhost:1234/timeline");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_max_entries, Some(500));
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("SKYCACHE_HTTP_PORT", "not-a-port"),
            ("SKYCACHE_UPSTREAM_TIMEOUT_SECS", "0"),
            ("SKYCACHE_CACHE_TTL_SECS", "-5"),
        ]);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(43_200));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config_from(&[("VISUAL_CROSSING_API_KEY", "super-secret")]);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
