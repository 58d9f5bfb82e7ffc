//! Bearer token claim decoding.
//!
//! Tokens are compact `header.payload.signature` strings with each part
//! base64url-encoded. Only the payload is read. The signature is NOT verified:
//! the decoded claims drive navigation only, never authorization decisions
//! that matter to the backend.

use base64::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Claim set carried in the token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Authorization level ("USER", "ADMIN")
    pub role: String,
    /// Subject, usually the account's username or id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry as a UNIX timestamp (informational, not enforced)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Any other claims the backend put in the payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Expiry claim as a timestamp, if present and representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Decode the claim set of a bearer token without verifying it.
pub fn decode_claims(token: &str) -> Result<TokenClaims, DecodeError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(DecodeError::PartCount(parts.len()));
    }

    let payload = parts[1];
    if payload.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let bytes = decode_segment(payload)?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;

    let Value::Object(mut map) = value else {
        return Err(DecodeError::Json("payload is not an object".to_string()));
    };

    let role = match map.remove("role") {
        Some(Value::String(role)) if !role.trim().is_empty() => role,
        _ => return Err(DecodeError::MissingRole),
    };
    let sub = map.get("sub").and_then(Value::as_str).map(str::to_string);
    let exp = map.get("exp").and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));
    if sub.is_some() {
        map.remove("sub");
    }
    if exp.is_some() {
        map.remove("exp");
    }

    Ok(TokenClaims {
        role,
        sub,
        exp,
        extra: map,
    })
}

/// base64url without padding is canonical; padded and standard-alphabet input
/// is accepted as well.
fn decode_segment(segment: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = segment.trim_end_matches('=');
    BASE64_URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| BASE64_STANDARD_NO_PAD.decode(trimmed))
        .map_err(|e| DecodeError::Base64(e.to_string()))
}
