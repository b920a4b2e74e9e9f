//! In-memory watermark store.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::Watermark,
    ports::{WatermarkStore, WatermarkStoreError, WatermarkStoreResult},
};

/// Thread-safe in-memory watermark store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWatermarkStore {
    state: Arc<RwLock<Option<Watermark>>>,
}

impl InMemoryWatermarkStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `watermark`.
    #[must_use]
    pub fn with_watermark(watermark: Watermark) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(watermark))),
        }
    }
}

#[async_trait]
impl WatermarkStore for InMemoryWatermarkStore {
    async fn load(&self) -> WatermarkStoreResult<Option<Watermark>> {
        let state = self
            .state
            .read()
            .map_err(|err| WatermarkStoreError::storage(std::io::Error::other(err.to_string())))?;
        Ok(*state)
    }

    async fn save(&self, watermark: Watermark) -> WatermarkStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| WatermarkStoreError::storage(std::io::Error::other(err.to_string())))?;
        *state = Some(watermark);
        Ok(())
    }
}
