//! Port contracts for board synchronisation.
//!
//! Ports define infrastructure-agnostic interfaces used by the services.

pub mod transport;
pub mod watermark;

pub use transport::{RpcTransport, RpcTransportError, RpcTransportResult};
pub use watermark::{WatermarkStore, WatermarkStoreError, WatermarkStoreResult};
