use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use sgw_routing::within_deadline;
use sgw_types::{CorrelationId, GatewayError, Object, ObjectKey};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `GET /object/{id}`: stream the object back with its stored content type.
pub async fn get_object_handler(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let ctx = state.request_context(correlation_id);
    let object = state.get.get_object(&ctx, &ObjectKey::new(id)).await?;
    object_response(object)
}

fn object_response(object: Object) -> Result<Response, ApiError> {
    let mut headers = HeaderMap::new();
    if !object.content_type.is_empty() {
        let value = HeaderValue::from_str(&object.content_type).map_err(|_| {
            GatewayError::internal(format!("stored content type {:?} is not a valid header", object.content_type))
        })?;
        headers.insert(CONTENT_TYPE, value);
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(object.size));

    let body = Body::from_stream(ReaderStream::new(object.content));
    Ok((StatusCode::OK, headers, body).into_response())
}

/// `PUT /object/{id}`: buffer the body and hand it to the routing service.
///
/// The request deadline starts before the body is read.
pub async fn put_object_handler(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<&'static str>, ApiError> {
    let ctx = state.request_context(correlation_id);
    // A stalled upload is bounded by the same deadline as the node call.
    let read = axum::body::to_bytes(body, state.max_body_bytes);
    let data = within_deadline(&ctx, "read request body", async { Ok(read.await) })
        .await?
        .map_err(|e| ApiError::BadRequest(format!("could not read request body: {e}")))?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let object = Object::from_bytes(ObjectKey::new(id), data, content_type);
    state.put.put_object(&ctx, object).await?;
    Ok(Json(""))
}
