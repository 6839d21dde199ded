//! HTTP gateway (Axum) exposing the validator.
//!
//! This module is primarily used by the `shelfcheck` server binary.

pub mod error;
pub mod handler;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::validate_handler;
pub use state::HandlerState;

use crate::cache::ValidationCache;
use crate::constants::{SHELFCHECK_STATUS_HEADER, SHELFCHECK_STATUS_HEALTHY};
use crate::judge::JudgeBackend;

pub fn create_router_with_state<B, C>(state: HandlerState<B, C>) -> Router
where
    B: JudgeBackend + 'static,
    C: ValidationCache + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/validate", post(validate_handler::<B, C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SHELFCHECK_STATUS_HEADER,
        HeaderValue::from_static(SHELFCHECK_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}
