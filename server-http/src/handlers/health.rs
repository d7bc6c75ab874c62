use crate::api::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    Ok(Json(HealthResponse {
        message: "OK".into(),
        cached_locations: state.lookup.cached_locations(),
    }))
}
