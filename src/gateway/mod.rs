//! HTTP gateway (Axum) in front of the similarity client.
//!
//! Validates inputs, invokes the shared [`SpaceClient`], and maps outcomes
//! to transport-level responses. Validation failures are never retried;
//! remote failures arrive here already retried by the client.
//!
//! [`SpaceClient`]: crate::space::SpaceClient

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handler::{compare_file_handler, compare_text_handler};
pub use state::HandlerState;

use payload::{HealthResponse, ServiceDescriptor};

use crate::space::SpaceTransport;

/// Builds the service router over the given state.
pub fn create_router_with_state<T>(state: HandlerState<T>) -> Router
where
    T: SpaceTransport + 'static,
{
    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/v1/compare-text", post(compare_text_handler))
        .route("/v1/compare-file", post(compare_file_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Service descriptor listing the available endpoints.
#[tracing::instrument(skip(state))]
pub async fn root_handler<T>(State(state): State<HandlerState<T>>) -> Response
where
    T: SpaceTransport + 'static,
{
    Json(ServiceDescriptor {
        ok: true,
        service: "simbridge similarity middleware",
        space_url: state.client.config().space_url.clone(),
        endpoints: ["/v1/compare-text", "/v1/compare-file", "/healthz"],
    })
    .into_response()
}

/// Liveness of this service plus reachability of the Space.
///
/// An unreachable or mis-described Space reports `degraded`; the probe
/// itself never fails, so the status code is always 200.
#[tracing::instrument(skip(state))]
pub async fn health_handler<T>(State(state): State<HandlerState<T>>) -> Response
where
    T: SpaceTransport + 'static,
{
    let healthy = state.client.healthcheck().await;

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        space: state.client.config().space_url.clone(),
    })
    .into_response()
}
