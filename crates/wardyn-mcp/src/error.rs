//! Error types for wardyn-mcp.

use thiserror::Error;

/// Result type alias for wardyn-mcp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors raised at tool registration time.
///
/// Per-call credential failures never appear here — they are converted
/// into unauthorized tool results at the adapter boundary.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Caller schema declares the reserved auth-context field.
    #[error("input schema for tool '{tool}' declares reserved field 'authContext'")]
    ReservedField { tool: String },

    /// Tool input schema is not a JSON object schema.
    #[error("input schema for tool '{tool}' is not a JSON object schema")]
    InvalidSchema { tool: String },
}
