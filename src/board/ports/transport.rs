//! RPC transport port.
//!
//! The transport sends a named method with a parameter object and returns
//! the raw result value. Connection handling, authentication, proxies and
//! timeouts belong to the implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transport calls.
pub type RpcTransportResult<T> = Result<T, RpcTransportError>;

/// Remote procedure call contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Invokes `method` with `params` and returns the result value.
    ///
    /// # Errors
    ///
    /// Returns [`RpcTransportError::Remote`] when the service answers with an
    /// error object, or [`RpcTransportError::Transport`] when the call could
    /// not be delivered or its answer could not be read.
    async fn call(&self, method: &str, params: Value) -> RpcTransportResult<Value>;
}

/// Errors returned by transport implementations.
#[derive(Debug, Clone, Error)]
pub enum RpcTransportError {
    /// The remote service reported a failure.
    #[error("remote error {code}: {message}")]
    Remote {
        /// Error code reported by the service.
        code: i64,
        /// Error message reported by the service.
        message: String,
    },

    /// Network or decoding failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RpcTransportError {
    /// Creates a remote failure.
    #[must_use]
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Wraps a network or decoding failure.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
