use std::fmt;
use std::io::Cursor;
use std::pin::Pin;

use tokio::io::AsyncRead;

use crate::key::ObjectKey;

/// Single-pass byte stream backing an [`Object`].
///
/// Dropping the reader releases whatever resource produced it.
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// The payload unit moved between the transport and a storage node.
pub struct Object {
    pub key: ObjectKey,
    pub content: ObjectReader,
    pub content_type: String,
    /// Declared size in bytes.
    pub size: u64,
}

impl Object {
    pub fn new(
        key: ObjectKey,
        content: ObjectReader,
        content_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            key,
            content,
            content_type: content_type.into(),
            size,
        }
    }

    /// Wrap an in-memory buffer; the declared size is the buffer length.
    pub fn from_bytes(
        key: ObjectKey,
        data: impl AsRef<[u8]> + Send + Unpin + 'static,
        content_type: impl Into<String>,
    ) -> Self {
        let size = data.as_ref().len() as u64;
        Self::new(key, Box::pin(Cursor::new(data)), content_type, size)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("key", &self.key)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
