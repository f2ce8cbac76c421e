//! Storage node and discovery contracts for the storage gateway.
//!
//! The gateway never talks to a backend directly. It reaches storage through
//! two capability traits:
//!
//! - [`StorageNode`]: one backend instance: identity, liveness, get, put
//! - [`NodeDiscovery`]: produces the current set of node handles
//!
//! # Implementations
//!
//! - [`InMemoryNode`]: `HashMap`-backed node for tests and local runs
//! - [`StaticDiscovery`]: returns a fixed set of handles, typically built
//!   from configuration
//!
//! # Contract Rules
//!
//! 1. `id()` is stable for the lifetime of a backend instance; the ring
//!    hashes it.
//! 2. `is_online()` is cheap and synchronous. It is evaluated on every
//!    lookup and never cached by the gateway.
//! 3. Node errors are returned as [`sgw_types::GatewayError`] so their kind
//!    survives the trip back to the transport.

pub mod discovery;
pub mod memory;
pub mod traits;

pub use discovery::{NodeSpec, StaticDiscovery};
pub use memory::{InMemoryNode, ObjectStat};
pub use traits::{NodeDiscovery, NodeHandle, StorageNode};
