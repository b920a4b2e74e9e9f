//! In-memory adapters for tests and local runs.

mod board;
mod watermark;

pub use board::{InMemoryBoard, RecordedCall};
pub use watermark::InMemoryWatermarkStore;
