use std::sync::{Arc, RwLock};

use tracing::debug;

use sgw_store::NodeHandle;
use sgw_types::{GatewayError, GatewayResult};

use crate::ring::{Crc32Hasher, HashRing, RingHasher};

/// Process-wide pool of storage nodes arranged on a consistent-hash ring.
///
/// The ring is an `Arc<HashRing>` behind a `RwLock`. `rebalance` builds the
/// replacement outside the lock and holds the write lock only for the swap;
/// `lookup` holds the read lock only to clone the `Arc`. A lookup therefore
/// observes the ring either before or after any rebalance, never a mix.
pub struct NodePool {
    ring: RwLock<Arc<HashRing>>,
    hasher: Arc<dyn RingHasher>,
}

impl NodePool {
    /// An empty pool using CRC32 placement. Every lookup fails until the
    /// first rebalance.
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(Crc32Hasher))
    }

    pub fn with_hasher(hasher: Arc<dyn RingHasher>) -> Self {
        Self {
            ring: RwLock::new(Arc::new(HashRing::empty())),
            hasher,
        }
    }

    /// Replace the ring with one built from `nodes`. Returns the entry count.
    ///
    /// Never fails; an empty list empties the ring.
    pub fn rebalance(&self, nodes: Vec<NodeHandle>) -> usize {
        let ring = Arc::new(HashRing::build(nodes, self.hasher.as_ref()));
        let len = ring.len();
        debug!(entries = len, nodes = ?ring.node_ids(), "rebalanced ring");
        *self.ring.write().expect("pool lock poisoned") = ring;
        len
    }

    /// The node owning `key`, if it is online.
    ///
    /// Fails with `NotAvailable` when the ring is empty or the owning node
    /// reports offline. There is no fallback to another node.
    pub fn lookup(&self, key: &str) -> GatewayResult<NodeHandle> {
        let ring = self.snapshot();
        let key_hash = self.hasher.hash(key.as_bytes());
        let entry = ring
            .locate(key_hash)
            .ok_or_else(GatewayError::storage_not_available)?;

        if !entry.node.is_online() {
            debug!(node_id = entry.node.id(), key, "owning node offline");
            return Err(GatewayError::storage_not_available());
        }
        Ok(entry.node.clone())
    }

    /// The current ring snapshot.
    pub fn snapshot(&self) -> Arc<HashRing> {
        self.ring.read().expect("pool lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl Default for NodePool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NodePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePool")
            .field("ring", &self.snapshot())
            .finish()
    }
}
