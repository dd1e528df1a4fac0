//! Error types for FortiGate operations.
//!
//! This module provides the error type shared by every FortiGate crate, the
//! coarse [`ErrorKind`] classification tools report on, and the uniform
//! `{"error": ..., "details": ...}` response shape.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// FortiOS error code for "entry not found".
pub const FORTIOS_ENTRY_NOT_FOUND: i64 = -3;

/// FortiOS error code for "a duplicate entry already exists".
pub const FORTIOS_DUPLICATE_ENTRY: i64 = -5;

/// Main error type for FortiGate operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Tool input is missing a field, has a malformed value or an unknown discriminator
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The device rejected the credentials or the session
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The device answered a forwarded call with a failure
    #[error("FortiGate API error (HTTP {status}): {message}")]
    RemoteApi {
        /// HTTP status code returned by the device
        status: u16,
        /// Human-readable summary of the failure
        message: String,
        /// Raw error payload returned by the device
        details: Option<Value>,
    },

    /// The device could not be reached
    #[error("Connection to FortiGate failed: {0}")]
    Connectivity(String),

    /// The request to the device timed out
    #[error("Request to FortiGate timed out: {0}")]
    Timeout(String),

    /// The device answered with a body that could not be parsed
    #[error("Invalid response from FortiGate: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for FortiGate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected before any remote call
    InvalidInput,
    /// Credentials or session rejected by the device
    AuthenticationFailure,
    /// Non-success answer from the device
    RemoteApiError,
    /// Network or timeout failure reaching the device
    ConnectivityError,
    /// Startup configuration problem
    Configuration,
}

/// Uniform failure shape returned by every tool.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Raw payload of the underlying API error, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Serialize into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("error".to_string(), Value::String(self.error.clone()));
        if let Some(details) = &self.details {
            map.insert("details".to_string(), details.clone());
        }
        Value::Object(map)
    }
}

impl Error {
    /// Build a remote API error from an HTTP status and the raw response body.
    ///
    /// The body is kept as JSON when it parses, otherwise as a string. The
    /// message prefers FortiOS' `cli_error`, then `error_message`/`message`.
    #[must_use]
    pub fn remote(status: u16, body: &str) -> Self {
        let details = if body.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.to_string())),
            )
        };
        let message = details
            .as_ref()
            .map_or_else(|| "empty response body".to_string(), describe_payload);

        Self::RemoteApi {
            status,
            message,
            details,
        }
    }

    /// Build a remote API error from a 2xx envelope whose status is `error`.
    #[must_use]
    pub fn from_envelope(envelope: Value) -> Self {
        let status = envelope
            .get("http_status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(500);
        Self::RemoteApi {
            status,
            message: describe_payload(&envelope),
            details: Some(envelope),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Authentication(_) => "AUTHENTICATION_FAILURE",
            Self::RemoteApi { .. } => "REMOTE_API_ERROR",
            Self::Connectivity(_) => "CONNECTIVITY_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Authentication(_) => ErrorKind::AuthenticationFailure,
            Self::RemoteApi { .. } | Self::InvalidResponse(_) => ErrorKind::RemoteApiError,
            Self::Connectivity(_) | Self::Timeout(_) => ErrorKind::ConnectivityError,
            Self::Config(_) | Self::InvalidEndpoint(_) => ErrorKind::Configuration,
        }
    }

    /// Returns the FortiOS numeric error code carried in the details, if any.
    #[must_use]
    pub fn fortios_code(&self) -> Option<i64> {
        match self {
            Self::RemoteApi {
                details: Some(details),
                ..
            } => details.get("error").and_then(Value::as_i64),
            _ => None,
        }
    }

    /// True when the device reported that the addressed entry does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::RemoteApi { status: 404, .. } => true,
            Self::RemoteApi { .. } => self.fortios_code() == Some(FORTIOS_ENTRY_NOT_FOUND),
            _ => false,
        }
    }

    /// True when the device reported a duplicate entry on creation.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        match self {
            Self::RemoteApi {
                message, details, ..
            } => {
                if self.fortios_code() == Some(FORTIOS_DUPLICATE_ENTRY) {
                    return true;
                }
                let text = details
                    .as_ref()
                    .map_or_else(|| message.to_lowercase(), |d| d.to_string().to_lowercase());
                text.contains("already exist") || text.contains("duplicate entry")
            }
            _ => false,
        }
    }

    /// Returns the raw details attached to this error, if any.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::RemoteApi { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Converts the error into the uniform [`ErrorResponse`].
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        let error = self.to_string();
        let details = match self {
            Self::RemoteApi { details, .. } => details,
            _ => None,
        };
        ErrorResponse { error, details }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_)
                | Self::Connectivity(_)
                | Self::Timeout(_)
                | Self::InvalidResponse(_)
                | Self::Config(_)
        )
    }
}

/// Pick a human-readable message out of a FortiOS error payload.
fn describe_payload(payload: &Value) -> String {
    match payload {
        Value::String(text) => text.clone(),
        Value::Object(map) => ["cli_error", "error_message", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map_or_else(
                || match map.get("error") {
                    Some(Value::Number(code)) => format!("FortiOS error code {code}"),
                    Some(Value::String(text)) => text.clone(),
                    _ => payload.to_string(),
                },
                str::to_string,
            ),
        other => other.to_string(),
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Connectivity(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}
