//! kanboard-sync: build-side task synchronisation for Kanboard.
//!
//! This crate keeps a remote Kanboard task in line with a declarative
//! description produced by a build, and watches a board for tasks that
//! should trigger new builds.
//!
//! # Architecture
//!
//! kanboard-sync follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the RPC transport and the
//!   watermark store
//! - **Adapters**: Concrete implementations of ports (in-memory board,
//!   file-backed watermark, JSON-RPC envelope)
//!
//! # Modules
//!
//! - [`board`]: Reconciliation, polling and fetching of board tasks
//! - [`config`]: Connection and upload settings

pub mod board;
pub mod config;
