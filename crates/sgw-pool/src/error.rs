use thiserror::Error;

/// Errors from the refresh scheduler lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("refresh scheduler already started")]
    AlreadyStarted,

    #[error("refresh scheduler requires a running tokio runtime")]
    NoRuntime,
}

pub type PoolResult<T> = Result<T, PoolError>;
