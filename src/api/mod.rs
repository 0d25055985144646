//! HTTP surface: router, handlers, and status mapping.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::FetchError;

/// Maps the core error taxonomy onto transport status codes. Kept out of
/// `error.rs` so the core stays transport-agnostic.
#[derive(Debug)]
pub struct ApiError(FetchError);

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FetchError::InvalidInput(_) | FetchError::CurrencyNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            FetchError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
            FetchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FetchError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            FetchError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            FetchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.0.to_string()
        }));

        (status, body).into_response()
    }
}
