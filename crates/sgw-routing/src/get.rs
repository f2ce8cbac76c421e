use std::sync::Arc;

use tracing::debug;

use sgw_pool::NodePool;
use sgw_types::{GatewayResult, Object, ObjectKey, RequestContext};

use crate::deadline::within_deadline;

/// Read path: key → owning node → object.
#[derive(Clone, Debug)]
pub struct GetObjectService {
    pool: Arc<NodePool>,
}

impl GetObjectService {
    pub fn new(pool: Arc<NodePool>) -> Self {
        Self { pool }
    }

    /// Fetch the object stored under `key`.
    ///
    /// `NotValid` for a malformed key (no pool access), `NotAvailable` from
    /// the pool, `Timeout` if the context deadline passes while the node
    /// works, otherwise exactly what the node returned.
    pub async fn get_object(&self, ctx: &RequestContext, key: &ObjectKey) -> GatewayResult<Object> {
        key.validate()?;

        let node = self.pool.lookup(key.as_str())?;
        debug!(
            correlation_id = %ctx.correlation_id,
            node_id = node.id(),
            %key,
            "routing get"
        );

        within_deadline(ctx, "get object", node.get_object(ctx, key)).await
    }
}
