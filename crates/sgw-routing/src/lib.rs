//! Routing services for the storage gateway.
//!
//! One service per operation. Both follow the same four steps and nothing
//! else: validate the key, resolve the owning node through the
//! [`NodePool`](sgw_pool::NodePool), delegate to that node within the
//! caller's deadline, return the node's result unchanged.
//!
//! There is no caching, no retry, and no second node.

pub mod deadline;
pub mod get;
pub mod put;

pub use deadline::within_deadline;
pub use get::GetObjectService;
pub use put::PutObjectService;

#[cfg(test)]
pub(crate) mod testutil;
