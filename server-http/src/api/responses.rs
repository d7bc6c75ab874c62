use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every non-200 weather response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    /// Upstream diagnostics, only present on 502
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            api_details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            error: error.into(),
            api_details: Some(details.unwrap_or(Value::Null)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub cached_locations: u64,
}
