//! Consistent-hash node pool for the storage gateway.
//!
//! The pool answers one question: which storage node owns this key. It holds
//! an immutable [`HashRing`] snapshot that is swapped wholesale whenever the
//! [`RefreshScheduler`] brings back a new node list from discovery.
//!
//! # Placement
//!
//! Each node sits on a 32-bit ring at the CRC32 (IEEE) of its identity. A key
//! is hashed the same way and owned by the first node at or after its
//! position, wrapping to the lowest entry. Placement depends only on node
//! identities, so refreshes that keep membership unchanged keep every key on
//! the same node.
//!
//! # Limitations
//!
//! - A lookup makes exactly one choice. If the owning node reports offline
//!   the lookup fails; it never walks to the next entry.
//! - Two identities with the same hash keep discovery order on the ring.

pub mod config;
pub mod error;
pub mod pool;
pub mod ring;
pub mod scheduler;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use pool::NodePool;
pub use ring::{Crc32Hasher, HashRing, RingEntry, RingHasher};
pub use scheduler::RefreshScheduler;
