//! Foundation types for the storage gateway.
//!
//! Every other gateway crate depends on `sgw-types`.
//!
//! # Key Types
//!
//! - [`ObjectKey`]: external object identifier and its format check
//! - [`Object`]: payload unit: key, single-pass byte stream, content type, size
//! - [`RequestContext`]: correlation id and optional deadline for one operation
//! - [`GatewayError`]: error taxonomy shared by the pool, routing, and nodes

pub mod context;
pub mod error;
pub mod key;
pub mod object;

pub use context::{CorrelationId, RequestContext};
pub use error::{GatewayError, GatewayResult};
pub use key::{ObjectKey, MAX_KEY_LEN};
pub use object::{Object, ObjectReader};
