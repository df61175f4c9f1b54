use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod backend;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod session;
pub mod views;

// Public (anonymous) vs. dashboard routes.
pub mod routes;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use backend::{BackendError, BackendState, HttpBackend, PostsBackend};
pub use config::AppConfig;
pub use gate::{GateConfig, GateDecision, GateState, RequestGate};

/// AppState
///
/// Single shared container for everything a request may need. Cloned per request;
/// every field is an `Arc` or cheap to clone and none is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Client for the external backend (real HTTP client or a test stub).
    pub backend: BackendState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
    /// The request gate built from `config.gate`.
    pub gate: GateState,
}

impl AppState {
    /// Builds the gate from the configuration's route sets.
    pub fn new(config: AppConfig, backend: BackendState) -> Self {
        let gate = Arc::new(RequestGate::new(config.gate.clone()));
        Self {
            backend,
            config,
            gate,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for BackendState {
    fn from_ref(app_state: &AppState) -> BackendState {
        app_state.backend.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for GateState {
    fn from_ref(app_state: &AppState) -> GateState {
        app_state.gate.clone()
    }
}

/// create_router
///
/// Assembles the page routes, puts the request gate in front of all of them
/// (including the not-found fallback, so unknown `/dashboard/...` paths are gated
/// too), and wraps everything in the request-id and tracing layers.
pub fn create_router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .fallback(handlers::not_found)
        // Clears the cookie on responses where the backend refused the session.
        .layer(middleware::map_response_with_state(
            state.config.clone(),
            session::expire_rejected_session,
        ))
        // The gate runs before any handler; out-of-scope paths pass straight through.
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            gate::gate_middleware,
        ))
        .with_state(state);

    // Observability layers (outermost). Redirects issued by the gate are traced too.
    base_router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Span per request with method, URI and the generated `x-request-id`, so every
/// log line of one request can be correlated. Headers (and so cookies) are not
/// recorded.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
