//! Error types for tdlayer-client.

use std::time::Duration;

use tdlayer_types::types;

use crate::ClientId;

// ─── TdError ──────────────────────────────────────────────────────────────────

/// An `error` object reported by the engine.
///
/// # Example
/// `{"@type":"error","code":429,"message":"Too Many Requests: retry after 30"}`
/// → `TdError { code: 429, message: "Too Many Requests: retry after 30" }`,
/// with [`TdError::retry_after`] returning 30 seconds.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("TDLib error {code}: {message}")]
pub struct TdError {
    pub code:    i32,
    pub message: String,
}

impl TdError {
    /// Flood-wait duration, if this is a `429 Too Many Requests: retry after N` error.
    pub fn retry_after(&self) -> Option<Duration> {
        if self.code != 429 {
            return None;
        }
        let (_, tail) = self.message.rsplit_once("retry after ")?;
        let secs: u64 = tail.trim().parse().ok()?;
        Some(Duration::from_secs(secs))
    }

    /// Match on the message, with optional wildcard prefix/suffix `'*'`.
    ///
    /// - `err.is("PHONE_CODE_INVALID")`: exact match
    /// - `err.is("PHONE_CODE_*")`: starts-with match
    /// - `err.is("*_INVALID")`: ends-with match
    pub fn is(&self, pattern: &str) -> bool {
        if let Some(prefix) = pattern.strip_suffix('*') {
            self.message.starts_with(prefix)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            self.message.ends_with(suffix)
        } else {
            self.message == pattern
        }
    }
}

impl From<types::Error> for TdError {
    fn from(e: types::Error) -> Self {
        Self { code: e.code, message: e.message }
    }
}

// ─── InvocationError ──────────────────────────────────────────────────────────

/// The error type returned from any [`crate::Client`] request.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// The engine answered with an `error` object.
    #[error(transparent)]
    Td(#[from] TdError),
    /// No reply arrived within the configured bound.
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    /// The client was unregistered before a reply arrived.
    #[error("request dropped")]
    Dropped,
    /// Encoding the request or decoding the reply failed.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// A reply arrived but has the wrong `@type` for this request.
    #[error("expected {expected}, got `{got}`")]
    UnexpectedReply { expected: &'static str, got: String },
}

impl InvocationError {
    /// Returns `true` if this is an engine error whose message matches `pattern`
    /// (supports `'*'` wildcards).
    pub fn is(&self, pattern: &str) -> bool {
        match self {
            Self::Td(e) => e.is(pattern),
            _           => false,
        }
    }

    /// If this is a flood-wait error, how long to wait.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Td(e) => e.retry_after(),
            _           => None,
        }
    }
}

// ─── RegistryError ────────────────────────────────────────────────────────────

/// Misuse of the client registry. Reported to the caller; other clients are unaffected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("client {0} is already registered")]
    AlreadyRegistered(ClientId),
    #[error("client {0} is not registered")]
    NotRegistered(ClientId),
}

// ─── ManagerError ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The native engine binding was already constructed in this process.
    #[error("the engine is already initialised in this process")]
    AlreadyInitialised,
    /// The manager was shut down.
    #[error("the manager has been shut down")]
    Shutdown,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn td(code: i32, message: &str) -> TdError {
        TdError { code, message: message.into() }
    }

    #[test]
    fn retry_after_parses_flood_wait() {
        assert_eq!(td(429, "Too Many Requests: retry after 30").retry_after(), Some(Duration::from_secs(30)));
        assert_eq!(td(400, "Too Many Requests: retry after 30").retry_after(), None);
        assert_eq!(td(429, "Too Many Requests").retry_after(), None);
    }

    #[test]
    fn wildcard_matching() {
        let e = td(400, "PHONE_CODE_INVALID");
        assert!(e.is("PHONE_CODE_INVALID"));
        assert!(e.is("PHONE_CODE_*"));
        assert!(e.is("*_INVALID"));
        assert!(!e.is("PHONE_NUMBER_*"));
    }

    #[test]
    fn invocation_error_delegates() {
        let e: InvocationError = td(429, "Too Many Requests: retry after 2").into();
        assert_eq!(e.retry_after(), Some(Duration::from_secs(2)));
        assert!(!InvocationError::Dropped.is("*"));
    }
}
