//! Consistent hashing ring snapshot.

use std::collections::HashMap;

use sgw_store::NodeHandle;

/// Hash function placing node identities and keys on the ring.
pub trait RingHasher: Send + Sync {
    fn hash(&self, data: &[u8]) -> u32;
}

/// CRC32 (IEEE) placement, the default.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Hasher;

impl RingHasher for Crc32Hasher {
    fn hash(&self, data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }
}

/// One node at its ring position.
#[derive(Clone)]
pub struct RingEntry {
    pub node: NodeHandle,
    pub hash: u32,
}

impl std::fmt::Debug for RingEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingEntry")
            .field("node", &self.node.id())
            .field("hash", &format_args!("{:#010x}", self.hash))
            .finish()
    }
}

/// Immutable ring: entries sorted ascending by hash.
///
/// Never mutated after construction. The pool replaces the whole snapshot
/// instead, so a reader holding one always sees a consistent ring.
#[derive(Clone, Debug, Default)]
pub struct HashRing {
    entries: Vec<RingEntry>,
}

impl HashRing {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Place `nodes` on the ring.
    ///
    /// One entry per distinct identity: a repeated identity keeps its first
    /// position in the input but takes the later handle. The sort is stable,
    /// so colliding hashes stay in input order.
    pub fn build(nodes: Vec<NodeHandle>, hasher: &dyn RingHasher) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        let mut entries: Vec<RingEntry> = Vec::with_capacity(nodes.len());

        for node in nodes {
            match positions.get(node.id()) {
                Some(&i) => entries[i].node = node,
                None => {
                    positions.insert(node.id().to_owned(), entries.len());
                    let hash = hasher.hash(node.id().as_bytes());
                    entries.push(RingEntry { node, hash });
                }
            }
        }

        entries.sort_by_key(|e| e.hash);
        Self { entries }
    }

    /// The entry owning `key_hash`: first entry with hash >= `key_hash`,
    /// wrapping to the lowest entry. `None` only for an empty ring.
    pub fn locate(&self, key_hash: u32) -> Option<&RingEntry> {
        let i = self.entries.partition_point(|e| e.hash < key_hash);
        self.entries.get(i).or_else(|| self.entries.first())
    }

    pub fn entries(&self) -> &[RingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Node identities in ring order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.node.id()).collect()
    }
}
