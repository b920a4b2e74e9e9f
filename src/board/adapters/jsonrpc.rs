//! JSON-RPC 2.0 request and response envelopes.
//!
//! Transports that speak HTTP wrap each call in a [`JsonRpcRequest`] and
//! unwrap the answer with [`JsonRpcResponse::into_result`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::ports::RpcTransportError;

/// Protocol version tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Outgoing call envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always `2.0`.
    pub jsonrpc: String,
    /// Remote method name.
    pub method: String,
    /// Correlation identifier echoed by the server.
    pub id: u64,
    /// Named parameter object.
    pub params: Value,
}

impl JsonRpcRequest {
    /// Creates a request envelope.
    #[must_use]
    pub fn new(method: impl Into<String>, id: u64, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            id,
            params,
        }
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: String,
}

/// Incoming answer envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version.
    #[serde(default)]
    pub jsonrpc: String,
    /// Correlation identifier.
    #[serde(default)]
    pub id: Option<u64>,
    /// Result value on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error object on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    /// Creates a successful answer to request `id`.
    #[must_use]
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Creates a failed answer to request `id`.
    #[must_use]
    pub fn failure(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id: Some(id),
            result: None,
            error: Some(JsonRpcErrorObject {
                code,
                message: message.into(),
            }),
        }
    }

    /// Unwraps the result value.
    ///
    /// A missing `result` member decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcTransportError::Remote`] when the envelope carries an
    /// error object.
    pub fn into_result(self) -> Result<Value, RpcTransportError> {
        match self.error {
            Some(error) => Err(RpcTransportError::remote(error.code, error.message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}
