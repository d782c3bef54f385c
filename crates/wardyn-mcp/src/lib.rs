//! Secured tool registration for MCP servers.
//!
//! This crate wraps tool registration so that every registered tool
//! carries an auth context in its input schema and routes each call
//! through a bearer-token gate before the business handler runs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       wardyn-mcp                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  schema — authContext field merged into tool input schemas  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  adapter — CallContext, wrapped callbacks, unauthorized     │
//! │  result; token decode via wardyn-auth                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  registry — SecureTools (implements SecureToolRegistry),    │
//! │  the registration entry points the server delegates to      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use wardyn_mcp::SecureTools;
//!
//! let mut tools = SecureTools::new();
//! tools.secure_tool_with_auth(
//!     "list_orders",
//!     "List the caller's orders",
//!     &json!({
//!         "type": "object",
//!         "properties": {
//!             "limit": { "type": "integer", "description": "Maximum results" }
//!         }
//!     }),
//!     None,
//!     |args, claims| async move {
//!         // claims are the decoded token payload; the handler never
//!         // runs when the token is missing or malformed
//!         todo!()
//!     },
//! )?;
//!
//! // Hand `tools` to the server; it delegates list_tools/call_tool here.
//! ```

pub mod adapter;
pub mod error;
pub mod registry;
pub mod schema;

// Re-exports — registry
pub use registry::{SecureToolRegistry, SecureTools};

// Re-exports — adapter
pub use adapter::{unauthorized_result, CallContext, HandlerFuture, UNAUTHORIZED_MESSAGE};

// Re-exports — schema
pub use schema::{auth_context_schema, with_auth_context, AUTH_CONTEXT_KEY};

// Re-exports — error
pub use error::{Error, Result};
