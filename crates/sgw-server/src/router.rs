use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, MethodRouter};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use sgw_types::CorrelationId;

use crate::error::panic_response;
use crate::handler;
use crate::middleware::correlation_id;
use crate::state::AppState;

/// Build the axum router with all gateway endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(handler::health_handler))
        .route("/healthcheck/", get(handler::health_handler))
        .route("/object/:id", object_routes())
        .route("/object/:id/", object_routes())
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            let correlation_id = req
                .extensions()
                .get::<CorrelationId>()
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::info_span!(
                "http",
                method = %req.method(),
                uri = %req.uri(),
                correlation_id = %correlation_id,
            )
        }))
        .layer(middleware::from_fn(correlation_id))
        .layer(CatchPanicLayer::custom(panic_response))
}

// Trailing slashes resolve to the same handlers.
fn object_routes() -> MethodRouter<AppState> {
    get(handler::get_object_handler).put(handler::put_object_handler)
}
