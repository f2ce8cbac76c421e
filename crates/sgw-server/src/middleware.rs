use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use sgw_types::CorrelationId;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Tag each request with a fresh correlation id.
///
/// The id goes into request extensions for handlers and tracing, and is
/// echoed as `x-request-id` on both the request and the response.
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let id = CorrelationId::new();
    let header = HeaderValue::from_str(&id.to_string()).ok();

    req.extensions_mut().insert(id);
    if let Some(value) = &header {
        req.headers_mut().insert(X_REQUEST_ID, value.clone());
    }

    let mut response = next.run(req).await;
    if let Some(value) = header {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
