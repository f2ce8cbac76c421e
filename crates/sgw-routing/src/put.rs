use std::sync::Arc;

use tracing::debug;

use sgw_pool::NodePool;
use sgw_types::{GatewayResult, Object, RequestContext};

use crate::deadline::within_deadline;

/// Write path: object → owning node.
#[derive(Clone, Debug)]
pub struct PutObjectService {
    pool: Arc<NodePool>,
}

impl PutObjectService {
    pub fn new(pool: Arc<NodePool>) -> Self {
        Self { pool }
    }

    /// Store `object` on the node owning its key.
    ///
    /// The stream, declared size, and content type reach the node
    /// unmodified. One attempt only; a rejected write is returned as is.
    pub async fn put_object(&self, ctx: &RequestContext, object: Object) -> GatewayResult<()> {
        object.key.validate()?;

        let node = self.pool.lookup(object.key.as_str())?;
        debug!(
            correlation_id = %ctx.correlation_id,
            node_id = node.id(),
            key = %object.key,
            size = object.size,
            content_type = %object.content_type,
            "routing put"
        );

        within_deadline(ctx, "put object", node.put_object(ctx, object)).await
    }
}
