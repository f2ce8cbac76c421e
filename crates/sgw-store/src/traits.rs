use std::sync::Arc;

use async_trait::async_trait;
use sgw_types::{GatewayResult, Object, ObjectKey, RequestContext};

/// Shared handle to a storage node.
pub type NodeHandle = Arc<dyn StorageNode>;

/// One backend storage instance.
///
/// Implementations must satisfy these invariants:
/// - `id()` never changes for the same backend instance.
/// - `is_online()` does no I/O; it reports the last known liveness.
/// - `get_object` reports a missing key as `GatewayError::NotFound`.
/// - `put_object` consumes the object's stream exactly once.
#[async_trait]
pub trait StorageNode: Send + Sync {
    /// Stable identity used for ring placement.
    fn id(&self) -> &str;

    fn is_online(&self) -> bool;

    async fn get_object(&self, ctx: &RequestContext, key: &ObjectKey) -> GatewayResult<Object>;

    async fn put_object(&self, ctx: &RequestContext, object: Object) -> GatewayResult<()>;
}

/// Reports which storage nodes currently exist.
///
/// May fail transiently. Callers on the refresh path log and swallow
/// failures; they never reach the request path.
#[async_trait]
pub trait NodeDiscovery: Send + Sync {
    async fn discover_nodes(&self, ctx: &RequestContext) -> GatewayResult<Vec<NodeHandle>>;
}
