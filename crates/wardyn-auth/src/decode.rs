//! Structural token decoding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::AuthError;

/// Claims carried in a token payload.
pub type Claims = Map<String, Value>;

/// Decode a compact three-segment token into its payload claims.
///
/// The token is split on `.` into header, payload, and signature
/// segments; each must be valid unpadded base64url. Only the payload is
/// parsed — **no** signature verification and no expiry, issuer, or
/// audience checks are performed. Callers relying on this decoder for
/// trust decisions must verify the token upstream.
///
/// # Errors
///
/// - [`AuthError::InvalidInput`] when the input is empty
/// - [`AuthError::Decode`] when the segment count is wrong, a segment is
///   not valid base64url, or the payload is not a JSON object
pub fn decode_token(token: &str) -> Result<Claims, AuthError> {
    if token.is_empty() {
        return Err(AuthError::InvalidInput("token is empty".to_string()));
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::Decode(format!(
            "expected 3 token segments, found {}",
            segments.len()
        )));
    }

    let decode_segment = |index: usize| {
        URL_SAFE_NO_PAD.decode(segments[index]).map_err(|e| {
            AuthError::Decode(format!("segment {index} is not valid base64url: {e}"))
        })
    };

    decode_segment(0)?;
    let payload = decode_segment(1)?;
    decode_segment(2)?;

    match serde_json::from_slice::<Value>(&payload) {
        Ok(Value::Object(claims)) => Ok(claims),
        Ok(_) => Err(AuthError::Decode(
            "token payload is not a JSON object".to_string(),
        )),
        Err(e) => Err(AuthError::Decode(format!(
            "failed to parse token payload: {e}"
        ))),
    }
}

/// Read a string-valued claim by name.
pub fn claim_str<'a>(claims: &'a Claims, name: &str) -> Option<&'a str> {
    claims.get(name).and_then(Value::as_str)
}

// ============================================================================
// Tests
// ============================================================================
