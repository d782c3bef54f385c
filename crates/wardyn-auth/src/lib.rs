//! Token-layer primitives for Wardyn.
//!
//! Provides:
//! - [`bearer_from_headers`] / [`bearer_from_parts`] — Bearer token extraction
//!   from the `Authorization` header
//! - [`decode_token`] — structural token decoding into [`Claims`]
//! - [`AuthError`] — credential error types
//!
//! Decoding here is purely structural: the token is split into its three
//! base64url segments and the payload is parsed, with **no** signature,
//! expiry, issuer, or audience verification. Trust decisions belong to
//! whatever validated the token upstream.

mod bearer;
mod decode;
mod error;

pub use bearer::{bearer_from_headers, bearer_from_parts};
pub use decode::{claim_str, decode_token, Claims};
pub use error::AuthError;
