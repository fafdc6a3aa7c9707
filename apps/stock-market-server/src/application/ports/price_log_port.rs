//! Price Log Port (Driven Port)
//!
//! Interface for the durable, append-only log of accepted price updates.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::ServiceError;

/// Errors from the durable price log.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("price log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized.
    #[error("price record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for ServiceError {
    fn from(error: StorageError) -> Self {
        Self::internal(format!("Failed to persist stock prices: {error}"))
    }
}

/// Port for appending batches of serialized records.
///
/// Each call appends every line (newline-terminated) as one unit; lines
/// from concurrent calls never interleave. An empty batch is a no-op write
/// but still counts as a flush.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceLog: Send + Sync {
    /// Append `lines` to the log and make them durable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write or sync fails.
    async fn append(&self, lines: &[String]) -> Result<(), StorageError>;
}
