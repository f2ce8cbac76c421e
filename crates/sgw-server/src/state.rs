use std::sync::Arc;
use std::time::Duration;

use sgw_pool::NodePool;
use sgw_routing::{GetObjectService, PutObjectService};
use sgw_types::{CorrelationId, RequestContext};

use crate::config::ApiConfig;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub get: GetObjectService,
    pub put: PutObjectService,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(pool: Arc<NodePool>, config: &ApiConfig) -> Self {
        Self {
            get: GetObjectService::new(pool.clone()),
            put: PutObjectService::new(pool),
            request_timeout: config.request_timeout(),
            max_body_bytes: config.max_body_bytes,
        }
    }

    /// Context for one request: its correlation id and the request deadline.
    pub fn request_context(&self, correlation_id: CorrelationId) -> RequestContext {
        RequestContext::new(correlation_id).timeout(self.request_timeout)
    }
}
