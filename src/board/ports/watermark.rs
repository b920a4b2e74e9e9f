//! Watermark persistence port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::board::domain::Watermark;

/// Result type for watermark store operations.
pub type WatermarkStoreResult<T> = Result<T, WatermarkStoreError>;

/// Storage for the single watermark of one poller instance.
///
/// Concurrent use of the same store by two pollers is not guarded against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Loads the stored watermark.
    ///
    /// Returns `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`WatermarkStoreError`] when the stored value cannot be read
    /// or decoded.
    async fn load(&self) -> WatermarkStoreResult<Option<Watermark>>;

    /// Replaces the stored watermark.
    ///
    /// # Errors
    ///
    /// Returns [`WatermarkStoreError::Storage`] when the value cannot be
    /// written.
    async fn save(&self, watermark: Watermark) -> WatermarkStoreResult<()>;
}

/// Errors returned by watermark store implementations.
#[derive(Debug, Clone, Error)]
pub enum WatermarkStoreError {
    /// The stored value could not be decoded.
    #[error("corrupt watermark: {0}")]
    Corrupt(String),

    /// Storage-layer failure.
    #[error("watermark storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl WatermarkStoreError {
    /// Wraps a storage error.
    #[must_use]
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
