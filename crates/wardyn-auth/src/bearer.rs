//! Bearer token extraction from request headers.

use http::HeaderMap;

/// Extract the bearer token from the `Authorization` header.
///
/// The `Bearer` scheme keyword is matched case-insensitively and
/// whitespace around the token is trimmed. Returns `None` when the
/// header is absent, uses a different scheme, or carries an empty token.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim_start();

    let (scheme, rest) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Extract the bearer token from HTTP request `Parts`.
///
/// Convenience over [`bearer_from_headers`] for servers that propagate
/// the inbound request parts into tool handler context.
pub fn bearer_from_parts(parts: &http::request::Parts) -> Option<String> {
    bearer_from_headers(&parts.headers)
}
