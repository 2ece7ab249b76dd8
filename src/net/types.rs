//! Wire types for the user endpoint and its errors.
//!
//! DESIGN
//! ======
//! The server owns the user schema. The client keeps the response body
//! verbatim inside [`User`] and only offers read helpers for the keys the
//! UI commonly looks at, so a schema change on the server never turns a
//! successful fetch into a parse failure.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// USER
// =============================================================================

/// Opaque user record exactly as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Value);

impl User {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Raw JSON body.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Look up a top-level attribute. `None` for missing keys or non-object bodies.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `id` attribute, whatever its JSON type.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    /// `None` for a JSON `null` body, which the server sends for "no user".
    #[must_use]
    pub fn into_present(self) -> Option<Self> {
        if self.0.is_null() { None } else { Some(self) }
    }

    /// The `name` attribute when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }
}

impl From<Value> for User {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Grepable error codes, shared by every error the store surfaces.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Failure of a user fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (connect, DNS, timeout, body read).
    #[error("user request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("user response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body was not JSON.
    #[error("user response parse failed: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_FETCH_REQUEST",
            Self::Status { .. } => "E_FETCH_STATUS",
            Self::Parse(_) => "E_FETCH_PARSE",
            Self::ClientBuild(_) => "E_FETCH_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

/// Decode a response body into a [`User`] without shape validation.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] when the body is not valid JSON.
pub fn parse_user(body: &str) -> Result<User, FetchError> {
    serde_json::from_str::<Value>(body)
        .map(User::from)
        .map_err(|e| FetchError::Parse(e.to_string()))
}
