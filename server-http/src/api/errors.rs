use crate::api::responses::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{Error, ServiceError};

pub const INVALID_LOCATION: &str = "Invalid location provided. Location cannot be empty.";
pub const UPSTREAM_TIMEOUT: &str = "External weather service request timed out.";
pub const UPSTREAM_UNREACHABLE: &str = "Could not connect to external weather service.";
pub const UNEXPECTED: &str = "An unexpected server error occurred.";

/// A failed weather request, rendered as `{"error": ...}` with the matching status.
///
/// This is the single place where the error taxonomy meets HTTP. Upstream
/// diagnostics are only forwarded for 502 responses, and nothing here ever
/// sees the API key.
#[derive(Debug)]
pub struct ApiError {
    location: String,
    error: Error,
}

impl ApiError {
    pub fn new(location: impl Into<String>, error: Error) -> Self {
        Self {
            location: location.into(),
            error,
        }
    }

    /// Failure with no classified cause
    pub fn unexpected(reason: impl Into<String>) -> Self {
        Self::new(String::new(), Error::Internal(reason.into()))
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.error {
            Error::InvalidLocation => StatusCode::BAD_REQUEST,
            Error::Service(ServiceError::UpstreamApi { status: 404, .. }) => StatusCode::NOT_FOUND,
            Error::Service(ServiceError::UpstreamApi { .. }) => StatusCode::BAD_GATEWAY,
            Error::Service(ServiceError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Error::Service(ServiceError::ConnectionFailure(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Service(ServiceError::Generic(_)) | Error::Config(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match &self.error {
            Error::InvalidLocation => ErrorResponse::new(INVALID_LOCATION),
            Error::Service(ServiceError::UpstreamApi { status: 404, .. }) => {
                ErrorResponse::new(format!(
                    "Location '{}' not found by external weather service.",
                    self.location
                ))
            }
            Error::Service(ServiceError::UpstreamApi {
                message, details, ..
            }) => ErrorResponse::with_details(
                format!("External weather API error: {}", message),
                details.clone(),
            ),
            Error::Service(ServiceError::Timeout) => ErrorResponse::new(UPSTREAM_TIMEOUT),
            Error::Service(ServiceError::ConnectionFailure(_)) => {
                ErrorResponse::new(UPSTREAM_UNREACHABLE)
            }
            Error::Service(ServiceError::Generic(message)) => ErrorResponse::new(format!(
                "An error occurred in the weather service: {}",
                message
            )),
            Error::Config(_) | Error::Internal(_) => ErrorResponse::new(UNEXPECTED),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Error::Config(_) | Error::Internal(_) = &self.error {
            tracing::error!(
                "An unexpected error occurred in weather view for {:?}: {}",
                self.location,
                self.error
            );
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}
