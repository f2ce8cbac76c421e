//! HTTP transport for the storage gateway.
//!
//! Thin layer over the routing services: parses requests, builds a
//! [`RequestContext`](sgw_types::RequestContext) with a correlation id and
//! deadline, calls the service, and renders the result or error.
//!
//! | Method & Path | Success |
//! |---|---|
//! | `GET /object/{id}` | object bytes with the stored `Content-Type` |
//! | `PUT /object/{id}` | empty JSON body |
//! | `GET /healthcheck` | health document |
//!
//! Errors are rendered as `{"status":"error","message":"..."}`.

pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ApiConfig, AppConfig, GatewayConfig, LogFormat};
pub use error::{ApiError, ErrorResponse, ServerError, ServerResult};
pub use handler::HealthResponse;
pub use router::build_router;
pub use server::{shutdown_signal, GatewayServer};
pub use state::AppState;
