//! Credential error types.

/// Errors that can occur while extracting or decoding a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header, wrong scheme, or empty bearer value.
    #[error("missing or empty bearer token")]
    MissingToken,

    /// Decoder input was unusable before any parsing was attempted.
    #[error("invalid token input: {0}")]
    InvalidInput(String),

    /// Token structure could not be decoded (wrong segment count, bad
    /// base64url, or a payload that is not a JSON object).
    #[error("failed to decode token: {0}")]
    Decode(String),
}
