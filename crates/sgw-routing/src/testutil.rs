use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sgw_pool::{NodePool, RingHasher};
use sgw_store::{NodeHandle, StorageNode};
use sgw_types::{GatewayError, GatewayResult, Object, ObjectKey, RequestContext};
use tokio::io::AsyncReadExt;

/// What a [`RecordingNode`] saw on put.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutRecord {
    pub key: String,
    pub declared_size: u64,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Node that records calls and answers with a scripted outcome.
pub struct RecordingNode {
    pub id: String,
    pub calls: AtomicUsize,
    pub puts: Mutex<Vec<PutRecord>>,
    pub fail_with: Option<GatewayError>,
    pub delay: Option<Duration>,
}

impl RecordingNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            calls: AtomicUsize::new(0),
            puts: Mutex::new(Vec::new()),
            fail_with: None,
            delay: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> GatewayResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StorageNode for RecordingNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_online(&self) -> bool {
        true
    }

    async fn get_object(&self, _ctx: &RequestContext, key: &ObjectKey) -> GatewayResult<Object> {
        self.enter().await?;
        Ok(Object::from_bytes(key.clone(), self.id.clone().into_bytes(), "text/plain"))
    }

    async fn put_object(&self, _ctx: &RequestContext, mut object: Object) -> GatewayResult<()> {
        self.enter().await?;
        let mut bytes = Vec::new();
        object.content.read_to_end(&mut bytes).await?;
        self.puts.lock().unwrap().push(PutRecord {
            key: object.key.into_inner(),
            declared_size: object.size,
            content_type: object.content_type,
            bytes,
        });
        Ok(())
    }
}

/// CRC32 hasher that counts how often the pool hashed something.
#[derive(Default)]
pub struct CountingHasher(pub AtomicUsize);

impl RingHasher for CountingHasher {
    fn hash(&self, data: &[u8]) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst);
        sgw_pool::Crc32Hasher.hash(data)
    }
}

/// A pool holding only `node`, plus the hasher to observe pool access.
pub fn single_node_pool(node: Arc<RecordingNode>) -> (Arc<NodePool>, Arc<CountingHasher>) {
    let hasher = Arc::new(CountingHasher::default());
    let pool = Arc::new(NodePool::with_hasher(hasher.clone()));
    pool.rebalance(vec![node as NodeHandle]);
    hasher.0.store(0, Ordering::SeqCst);
    (pool, hasher)
}
