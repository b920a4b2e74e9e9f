//! Adapter implementations for board synchronisation ports.

pub mod file;
pub mod jsonrpc;
pub mod memory;
