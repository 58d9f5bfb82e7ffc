//! Error types for token decoding and credential storage.

use thiserror::Error;

/// Reasons a bearer token could not be turned into claims.
///
/// These never reach callers of [`crate::derive_session`]; they collapse into
/// the anonymous session. They are public so tooling can explain a rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Token does not have exactly three dot-separated parts
    #[error("Malformed token: expected 3 parts, found {0}")]
    PartCount(usize),

    /// Payload segment is empty
    #[error("Malformed token: empty payload")]
    EmptyPayload,

    /// Payload is not valid base64url
    #[error("Invalid payload encoding: {0}")]
    Base64(String),

    /// Payload is not a JSON object
    #[error("Invalid payload JSON: {0}")]
    Json(String),

    /// Payload has no usable `role` claim
    #[error("Missing role claim")]
    MissingRole,
}

/// Credential storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document is not valid JSON
    #[error("Storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
