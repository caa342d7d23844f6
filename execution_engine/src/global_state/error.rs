use thiserror::Error;

use frontier_types::bytesrepr;

/// Error enum representing possible errors in global state interactions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// (De)serialization error.
    #[error("{0}")]
    BytesRepr(#[from] bytesrepr::Error),

    /// Concurrency error.
    #[error("Another thread panicked while holding a lock")]
    Poison,
}
