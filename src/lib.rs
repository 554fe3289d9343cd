use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, Query, Request, State},
    http::{HeaderName, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core components of the navigation access controller.
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod store;

// Guard-segregated route classification and view shells.
pub mod routes;

use guard::Decision;
use models::{DecisionQuery, ViewShell};
use routes::{admin, authenticated, onboarding, public};

// --- Public Re-exports ---

// Makes the core state types easily accessible to the entry point (main.rs)
// and to integration tests.
pub use client::ApiClient;
pub use config::{AppConfig, Env};
pub use error::PortalError;
pub use store::{AuthSnapshot, AuthStore, GatewayState, ProfileGateway};

/// AppState
///
/// The unified state pattern: one thread-safe container holding the auth
/// store, the backend gateway, and the immutable configuration, shared
/// across all navigations.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide session/profile store. Guards only read it.
    pub store: Arc<AuthStore>,
    /// The backend profile gateway (HTTP in production, mocked in tests).
    pub gateway: GatewayState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Allow handlers and middleware to selectively pull components from the
// shared AppState.

impl FromRef<AppState> for Arc<AuthStore> {
    fn from_ref(app_state: &AppState) -> Arc<AuthStore> {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for GatewayState {
    fn from_ref(app_state: &AppState) -> GatewayState {
        app_state.gateway.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

// --- Decision -> HTTP Mapping ---

impl IntoResponse for Decision {
    /// Every decision resolves to a concrete response; no branch may leave
    /// the client with a blank page.
    fn into_response(self) -> Response {
        match self {
            // Only reachable when a decision is returned directly (the
            // guard middleware runs the inner handler on Render).
            Decision::Render => StatusCode::NO_CONTENT.into_response(),
            Decision::Redirect { to, return_to } => {
                // The preserved origin path rides along as a query
                // parameter so the login screen can navigate back.
                let location = match return_to {
                    Some(from) => format!("{to}?next={from}"),
                    None => to,
                };
                Redirect::to(&location).into_response()
            }
            Decision::Loading => (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, "1")],
                Json(ViewShell {
                    view: "loading".to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// navigation_guard
///
/// The declarative per-route-group wrapper. Each guarded route group is
/// layered with this middleware; on every navigation it evaluates the guard
/// pipeline against one store snapshot and either runs the inner view shell
/// (`Render`), answers with a 303 (`Redirect`), or holds the client on a
/// retryable loading response (`Loading`).
async fn navigation_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let decision = guard::evaluate(&path, &state.store.snapshot());

    tracing::debug!(path = %path, decision = ?decision, "navigation evaluated");

    match decision {
        Decision::Render => next.run(request).await,
        other => other.into_response(),
    }
}

/// nav_decision
///
/// Programmatic access to the pipeline: the SPA router asks for the decision
/// on a target path before committing to a client-side transition. This
/// endpoint is intentionally unguarded — it answers questions about access,
/// it does not grant any.
async fn nav_decision(
    State(state): State<AppState>,
    Query(query): Query<DecisionQuery>,
) -> Json<Decision> {
    Json(guard::evaluate(&query.path, &state.store.snapshot()))
}

/// create_router
///
/// Assembles the routing structure: the decision endpoint, then the four
/// guard-segregated view-shell groups, each wrapped in the navigation guard,
/// plus the observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // Every route group gets the same guard layer; the pipeline itself
    // dispatches on the path's route class.
    let guarded = |router: Router<AppState>| {
        router.route_layer(middleware::from_fn_with_state(
            state.clone(),
            navigation_guard,
        ))
    };

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Programmatic decision endpoint for the SPA router.
        .route("/nav/decision", get(nav_decision))
        // View-shell groups, one per route class.
        .merge(guarded(public::public_routes()))
        .merge(guarded(onboarding::onboarding_routes()))
        .merge(guarded(authenticated::gated_routes()))
        .merge(guarded(admin::admin_routes()))
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle
                // in a span correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: extracts the `x-request-id`
/// header (when present) and records it alongside the method and URI so
/// every log line for one navigation shares a correlation ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "navigation",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
