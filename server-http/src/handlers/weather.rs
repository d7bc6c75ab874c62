use crate::api::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use shared::Error;
use skycache::LookupSource;
use tracing::{info, warn};

const X_CACHE: &str = "x-cache";

/// GET /weather/:location
pub async fn get_weather(
    State(state): State<AppState>,
    location: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(location) = location.map_err(|rejection| {
        warn!("Rejected weather request path: {}", rejection.body_text());
        ApiError::new(String::new(), Error::InvalidLocation)
    })?;
    info!("Received GET request for location: {}", location);

    let lookup = state
        .lookup
        .lookup(&location)
        .await
        .map_err(|e| ApiError::new(location.as_str(), e))?;

    let cache_status = match lookup.source {
        LookupSource::Cache => "HIT",
        LookupSource::Upstream => "MISS",
    };

    Ok(([(X_CACHE, cache_status)], Json(lookup.payload)).into_response())
}

/// GET /weather with no location segment
pub async fn missing_location() -> ApiError {
    warn!("Received weather request without a location");
    ApiError::new(String::new(), Error::InvalidLocation)
}
