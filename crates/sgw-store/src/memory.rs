use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tracing::debug;

use sgw_types::{GatewayError, GatewayResult, Object, ObjectKey, RequestContext};

use crate::traits::StorageNode;

const MAX_PREALLOC: u64 = 64 * 1024;

/// Metadata of an object held by an [`InMemoryNode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectStat {
    pub content_type: String,
    pub size: u64,
}

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// In-memory, HashMap-based storage node.
///
/// Intended for tests and local runs. Objects live behind a `RwLock`; the
/// online flag can be flipped at any time to simulate a backend going away.
/// An optional latency is applied before every get and put.
pub struct InMemoryNode {
    id: String,
    online: AtomicBool,
    latency: Option<Duration>,
    objects: RwLock<HashMap<ObjectKey, StoredObject>>,
}

impl InMemoryNode {
    /// Create an empty, online node.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            online: AtomicBool::new(true),
            latency: None,
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Delay every get and put by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.read().expect("lock poisoned").contains_key(key)
    }

    pub fn stat(&self, key: &ObjectKey) -> Option<ObjectStat> {
        self.objects
            .read()
            .expect("lock poisoned")
            .get(key)
            .map(|obj| ObjectStat {
                content_type: obj.content_type.clone(),
                size: obj.data.len() as u64,
            })
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl StorageNode for InMemoryNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    async fn get_object(&self, ctx: &RequestContext, key: &ObjectKey) -> GatewayResult<Object> {
        self.simulate_latency().await;
        let stored = self
            .objects
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(GatewayError::object_not_found)?;
        debug!(
            correlation_id = %ctx.correlation_id,
            node_id = %self.id,
            %key,
            size = stored.data.len(),
            "read object"
        );
        Ok(Object::from_bytes(key.clone(), stored.data, stored.content_type))
    }

    async fn put_object(&self, ctx: &RequestContext, mut object: Object) -> GatewayResult<()> {
        self.simulate_latency().await;
        // The declared size is caller input; cap what we reserve up front.
        let reserve = object.size.min(MAX_PREALLOC) as usize;
        let mut buf = Vec::with_capacity(reserve);
        object.content.read_to_end(&mut buf).await?;
        if buf.len() as u64 != object.size {
            return Err(GatewayError::internal(format!(
                "declared size {} does not match stream length {}",
                object.size,
                buf.len()
            )));
        }
        debug!(
            correlation_id = %ctx.correlation_id,
            node_id = %self.id,
            key = %object.key,
            size = buf.len(),
            "wrote object"
        );
        let stored = StoredObject {
            data: Bytes::from(buf),
            content_type: object.content_type,
        };
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(object.key, stored);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryNode")
            .field("id", &self.id)
            .field("online", &self.is_online())
            .field("object_count", &self.len())
            .finish()
    }
}
