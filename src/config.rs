//! Connection and behaviour settings for the board integration.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Default attachment size ceiling in bytes.
pub const DEFAULT_ATTACHMENT_MAX_SIZE: u64 = 1_000_000;

/// Settings shared by the locator, reconciler, poller and fetcher.
///
/// The value is passed explicitly into each service constructor; there is
/// no process-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanboardConfig {
    endpoint: String,
    api_token: String,
    attachment_max_size: u64,
    debug_mode: bool,
}

impl Default for KanboardConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_token: String::new(),
            attachment_max_size: DEFAULT_ATTACHMENT_MAX_SIZE,
            debug_mode: false,
        }
    }
}

impl KanboardConfig {
    /// Creates a configuration for `endpoint` authenticated with `api_token`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Sets the attachment size ceiling in bytes. `0` disables the ceiling.
    #[must_use]
    pub const fn with_attachment_max_size(mut self, bytes: u64) -> Self {
        self.attachment_max_size = bytes;
        self
    }

    /// Enables payload logging at info level.
    #[must_use]
    pub const fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Returns the JSON-RPC endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the API token.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Returns the configured ceiling, `0` meaning unlimited.
    #[must_use]
    pub const fn attachment_max_size(&self) -> u64 {
        self.attachment_max_size
    }

    /// Returns the effective attachment ceiling, or `None` when unlimited.
    #[must_use]
    pub const fn attachment_limit(&self) -> Option<u64> {
        match self.attachment_max_size {
            0 => None,
            limit => Some(limit),
        }
    }

    /// Returns whether payload logging is enabled.
    #[must_use]
    pub const fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Value of the `X-API-Auth` header expected by the remote service.
    #[must_use]
    pub fn api_auth_header(&self) -> String {
        STANDARD.encode(format!("jsonrpc:{}", self.api_token))
    }
}
