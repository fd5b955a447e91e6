//! Bearer token inspection
//!
//! Tokens are opaque to the client except for one thing: the `exp` claim in
//! the middle segment of `header.payload.signature`. The signature is never
//! checked here; the server does that. Anything the client cannot read is
//! treated as expired.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::Value;

/// base64url that accepts the payload with or without `=` padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Parsed payload segment
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// Expiry in epoch seconds
    pub exp: i64,
    /// Full payload object
    pub raw: serde_json::Map<String, Value>,
}

/// Decode the payload of a three-segment token
///
/// Returns `None` for anything that is not exactly three segments, whose
/// middle segment is not base64url JSON, or that has no numeric `exp`.
/// An `exp` holding a decimal integer string counts as numeric.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let bytes = URL_SAFE_LENIENT.decode(parts[1]).ok()?;
    let payload: Value = serde_json::from_slice(&bytes).ok()?;
    let raw = match payload {
        Value::Object(map) => map,
        _ => return None,
    };

    let exp = match raw.get("exp")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    Some(TokenClaims { exp, raw })
}

/// Whether `token` is expired at `now` (epoch seconds); unreadable tokens are expired
pub fn is_expired_at(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Some(claims) => {
            tracing::debug!("Token expiry: {} | current time: {}", claims.exp, now);
            claims.exp < now
        }
        None => {
            tracing::debug!("Token could not be decoded; treating as expired");
            true
        }
    }
}

/// Whether `token` is expired right now
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp())
}

/// Short prefix for log lines; never log a whole credential
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}…", prefix)
}

/// Build an unsigned token carrying `exp`; handy for tests and fixtures
pub fn unsigned_token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_LENIENT.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_LENIENT.encode(format!(r#"{{"exp":{}}}"#, exp));
    format!("{}.{}.signature", header, payload)
}
