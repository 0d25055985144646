//! Router assembly for the conversion service.

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{AppState, convert_handler, crypto_handler, health_handler, root_handler};

/// Builds the service router.
///
/// Endpoints:
/// - `GET /` - service banner
/// - `GET /health` - liveness probe
/// - `GET /convert` - fiat currency conversion
/// - `GET /crypto` - crypto to fiat conversion
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/convert", get(convert_handler))
        .route("/crypto", get(crypto_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
