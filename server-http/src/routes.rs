use crate::api::ApiError;
use crate::handlers;
use crate::state::AppState;
use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Weather lookup, with or without the trailing slash
        .route("/weather", get(handlers::missing_location))
        .route("/weather/", get(handlers::missing_location))
        .route("/weather/{location}", get(handlers::get_weather))
        .route("/weather/{location}/", get(handlers::get_weather))
        // Middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::unexpected(reason).into_response()
}
