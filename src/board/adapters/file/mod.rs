//! Filesystem watermark store.
//!
//! The watermark lives in a fixed-name file inside the trigger instance's
//! directory as a four-byte big-endian signed integer. Access goes through a
//! capability-scoped directory handle.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;

use crate::board::{
    domain::Watermark,
    ports::{WatermarkStore, WatermarkStoreError, WatermarkStoreResult},
};

/// Name of the watermark file inside the trigger instance directory.
pub const WATERMARK_FILE_NAME: &str = "kanboard-query-trigger-last";

/// Watermark store backed by a file in a trigger instance directory.
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    dir: Arc<Dir>,
}

impl FileWatermarkStore {
    /// Creates a store writing into `dir`.
    #[must_use]
    pub fn new(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }

    /// Opens the trigger instance directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WatermarkStoreError::Storage`] when the directory cannot be
    /// opened.
    pub fn open(path: &Utf8Path) -> WatermarkStoreResult<Self> {
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(WatermarkStoreError::storage)?;
        Ok(Self::new(dir))
    }
}

#[async_trait]
impl WatermarkStore for FileWatermarkStore {
    async fn load(&self) -> WatermarkStoreResult<Option<Watermark>> {
        let bytes = match self.dir.read(WATERMARK_FILE_NAME) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(WatermarkStoreError::storage(err)),
        };
        let Some(raw) = bytes.first_chunk::<4>() else {
            return Err(WatermarkStoreError::Corrupt(format!(
                "expected 4 bytes, found {}",
                bytes.len()
            )));
        };
        #[expect(
            clippy::big_endian_bytes,
            reason = "the watermark file format is a big-endian i32"
        )]
        let timestamp = i32::from_be_bytes(*raw);
        Ok(Some(Watermark::new(timestamp)))
    }

    async fn save(&self, watermark: Watermark) -> WatermarkStoreResult<()> {
        #[expect(
            clippy::big_endian_bytes,
            reason = "the watermark file format is a big-endian i32"
        )]
        let bytes = watermark.value().to_be_bytes();
        self.dir
            .write(WATERMARK_FILE_NAME, bytes)
            .map_err(WatermarkStoreError::storage)
    }
}
