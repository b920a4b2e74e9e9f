//! Typed client for the board's remote procedure calls.
//!
//! [`BoardClient`] serialises a typed request, sends it through an
//! [`RpcTransport`] and decodes the loosely typed answer into the request's
//! declared output.

pub mod methods;
pub mod results;

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, trace};

use crate::board::ports::{RpcTransport, RpcTransportError};

pub use methods::RpcMethod;
pub use results::{Acknowledged, CreateOutcome, RemoteList, TaskTags};

/// Errors returned by [`BoardClient`] calls.
#[derive(Debug, Clone, Error)]
pub enum BoardClientError {
    /// The remote service answered with an error object.
    #[error("{method} failed with remote error {code}: {message}")]
    Remote {
        /// Method that failed.
        method: &'static str,
        /// Error code reported by the service.
        code: i64,
        /// Error message reported by the service.
        message: String,
    },

    /// The call could not be delivered.
    #[error("{method} could not be delivered: {source}")]
    Transport {
        /// Method that failed.
        method: &'static str,
        /// Underlying transport failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The request or its answer could not be (de)serialised.
    #[error("{method} payload could not be decoded: {source}")]
    Codec {
        /// Method that failed.
        method: &'static str,
        /// Underlying serde failure.
        source: Arc<serde_json::Error>,
    },
}

impl BoardClientError {
    /// Returns the remote method the error relates to.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Remote { method, .. }
            | Self::Transport { method, .. }
            | Self::Codec { method, .. } => method,
        }
    }

    pub(crate) fn codec(method: &'static str, err: serde_json::Error) -> Self {
        Self::Codec {
            method,
            source: Arc::new(err),
        }
    }

    fn from_transport(method: &'static str, err: RpcTransportError) -> Self {
        match err {
            RpcTransportError::Remote { code, message } => Self::Remote {
                method,
                code,
                message,
            },
            RpcTransportError::Transport(source) => Self::Transport { method, source },
        }
    }
}

/// Result type for [`BoardClient`] calls.
pub type BoardClientResult<T> = Result<T, BoardClientError>;

/// Typed facade over an [`RpcTransport`].
pub struct BoardClient<T>
where
    T: RpcTransport,
{
    transport: Arc<T>,
    debug_mode: bool,
}

impl<T> Clone for BoardClient<T>
where
    T: RpcTransport,
{
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            debug_mode: self.debug_mode,
        }
    }
}

impl<T> BoardClient<T>
where
    T: RpcTransport,
{
    /// Creates a client. With `debug_mode` set, request and response
    /// payloads are logged at info level instead of trace.
    #[must_use]
    pub const fn new(transport: Arc<T>, debug_mode: bool) -> Self {
        Self {
            transport,
            debug_mode,
        }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Sends `request` and decodes its result.
    ///
    /// # Errors
    ///
    /// Returns [`BoardClientError`] when the request cannot be encoded, the
    /// transport fails, or the answer does not decode into the method's
    /// output type.
    pub async fn send<M>(&self, request: &M) -> BoardClientResult<M::Output>
    where
        M: RpcMethod + Sync,
    {
        let params =
            serde_json::to_value(request).map_err(|err| BoardClientError::codec(M::NAME, err))?;
        self.log_payload(M::NAME, "request", &params);

        let answer = self
            .transport
            .call(M::NAME, params)
            .await
            .map_err(|err| BoardClientError::from_transport(M::NAME, err))?;
        self.log_payload(M::NAME, "response", &answer);

        serde_json::from_value(answer).map_err(|err| BoardClientError::codec(M::NAME, err))
    }

    fn log_payload(&self, method: &'static str, direction: &'static str, payload: &Value) {
        if self.debug_mode {
            info!(method, direction, %payload, "board rpc");
        } else {
            trace!(method, direction, %payload, "board rpc");
        }
    }
}
