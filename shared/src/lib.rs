// shared/src/lib.rs

/// Failure kinds produced by the upstream weather client.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ServiceError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("connection to upstream failed: {0}")]
    ConnectionFailure(String),
    #[error("{message}")]
    UpstreamApi {
        status: u16,
        message: String,
        // Parsed body of the failed response, when it was JSON
        details: Option<serde_json::Value>,
    },
    #[error("{0}")]
    Generic(String),
}

impl ServiceError {
    pub fn upstream_api(status: u16, details: Option<serde_json::Value>) -> Self {
        ServiceError::UpstreamApi {
            status,
            message: format!("API returned non-200 status code: {}", status),
            details,
        }
    }

    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Timeout => "timeout",
            ServiceError::ConnectionFailure(_) => "connection_failure",
            ServiceError::UpstreamApi { .. } => "upstream_api",
            ServiceError::Generic(_) => "generic",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::UpstreamApi { status: 404, .. })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid location: location cannot be empty")]
    InvalidLocation,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
