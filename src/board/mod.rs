//! Synchronisation of build-side task descriptions with a Kanboard-style
//! board.
//!
//! A [`services::TaskReconciler`] creates or updates one remote task per
//! reference, a [`services::QueryPoller`] reports tasks changed since the
//! last stored watermark, and a [`services::TaskFetcher`] downloads a task
//! into the workspace. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Typed remote calls in [`client`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod client;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
