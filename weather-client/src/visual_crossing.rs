use async_trait::async_trait;
use reqwest::{Client, Url};
use shared::config::Config;
use shared::{Error, Result, ServiceError};
use skycache::{WeatherPayload, WeatherProvider};
use std::time::Duration;
use tracing::{error, info, instrument};

const UNIT_GROUP: &str = "metric";
const INCLUDE: &str = "days";

/// Client for the Visual Crossing timeline endpoint
///
/// Sends one GET per call with a fixed timeout and turns every outcome into
/// either a payload or a `ServiceError`. It never retries and never caches.
#[derive(Clone)]
pub struct VisualCrossingClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl VisualCrossingClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid upstream url '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "upstream url '{}' cannot take a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: parsed,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.upstream_base_url,
            config.api_key.clone(),
            config.upstream_timeout,
        )
    }

    /// `{base}/{location}` with the location as one percent-encoded segment.
    /// The credential is attached later as a query parameter so this URL is safe to log.
    fn location_url(&self, location: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(location);
        }
        url
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingClient {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, location: &str) -> std::result::Result<WeatherPayload, ServiceError> {
        let url = self.location_url(location);
        info!("Attempting to fetch weather data for location: {}", location);

        let response = self
            .client
            .get(url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("unitGroup", UNIT_GROUP),
                ("include", INCLUDE),
            ])
            .send()
            .await
            .map_err(|e| classify_request_error(location, e))?;

        let status = response.status();
        if !status.is_success() {
            // The body is diagnostic only; a non-JSON body is not an error of its own
            let details = response.json::<serde_json::Value>().await.ok();
            let err = ServiceError::upstream_api(status.as_u16(), details);
            error!(
                "Weather API returned status {} for location: {}",
                status.as_u16(),
                location
            );
            return Err(err);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_request_error(location, e))?;

        let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
            error!("Failed to parse weather data for {}: {}", location, e);
            ServiceError::Generic(format!(
                "An unexpected error occurred while parsing weather data for {}: {}",
                location, e
            ))
        })?;

        info!("Successfully fetched weather data for location: {}", location);
        Ok(WeatherPayload::new(value))
    }
}

/// Map a transport failure onto the taxonomy. The request URL carries the
/// API key, so it is stripped before the error is logged or kept.
fn classify_request_error(location: &str, err: reqwest::Error) -> ServiceError {
    let err = err.without_url();

    if err.is_timeout() {
        error!("Request timed out while fetching weather for {}", location);
        ServiceError::Timeout
    } else if err.is_connect() {
        error!(
            "Connection error while fetching weather for {}: {}",
            location, err
        );
        ServiceError::ConnectionFailure(format!(
            "Connection error to weather API for {}",
            location
        ))
    } else {
        error!(
            "An error occurred during the API request for {}: {}",
            location, err
        );
        ServiceError::Generic(format!(
            "An unexpected API request error occurred for {}: {}",
            location, err
        ))
    }
}

impl std::fmt::Debug for VisualCrossingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualCrossingClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}
