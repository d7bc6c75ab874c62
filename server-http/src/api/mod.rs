pub mod errors;
pub mod responses;

pub use errors::ApiError;
pub use responses::{ErrorResponse, HealthResponse};
