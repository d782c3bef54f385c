//! Secured tool registration and dispatch.
//!
//! [`SecureTools`] is the registry a hosting MCP server delegates
//! `list_tools` / `call_tool` to. Every tool registered here carries the
//! auth-context field in its input schema and routes through the
//! callback adapters in [`crate::adapter`].

use std::future::Future;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Tool, ToolAnnotations};
use serde_json::{Map, Value};

use wardyn_auth::Claims;

use crate::adapter::{
    dispatch_authenticated, dispatch_forward, AuthHandler, CallContext, ForwardHandler,
    HandlerFuture, HandlerResult,
};
use crate::error::Result;
use crate::schema::secure_input_schema;

/// Trait for registries of secured tools.
///
/// The hosting server delegates tool listing and dispatch here. Unlike a
/// plain tool registry, dispatch receives the per-invocation
/// [`CallContext`] so wrapped callbacks can reach the inbound headers.
pub trait SecureToolRegistry: Send + Sync {
    /// Returns information about all registered tools.
    fn tools(&self) -> Vec<Tool>;

    /// Dispatches a tool call by name.
    ///
    /// Returns `None` if the tool is not recognized by this registry.
    fn call(
        &self,
        name: &str,
        args: Map<String, Value>,
        ctx: CallContext,
    ) -> Option<HandlerFuture>;

    /// Returns the number of registered tools.
    fn tool_count(&self) -> usize {
        self.tools().len()
    }

    /// Check if a tool exists by name.
    fn has_tool(&self, name: &str) -> bool {
        self.tools().iter().any(|t| t.name == name)
    }
}

enum SecureHandler {
    Forward(ForwardHandler),
    Authenticated(AuthHandler),
}

/// Registry of secured tools.
///
/// Entries are kept in registration order and dispatch returns the
/// first name match; duplicate names are left to the hosting
/// framework's conflict policy.
///
/// # Example
///
/// ```rust,ignore
/// let mut tools = SecureTools::new();
/// tools.secure_tool_with_auth(
///     "whoami",
///     "Report the calling user",
///     &serde_json::json!({"type": "object", "properties": {}}),
///     None,
///     |_args, claims| async move {
///         let sub = wardyn_auth::claim_str(&claims, "sub").unwrap_or("unknown");
///         Ok(CallToolResult::success(vec![Content::text(sub.to_string())]))
///     },
/// )?;
/// ```
pub struct SecureTools {
    entries: Vec<(Tool, SecureHandler)>,
}

impl SecureTools {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a secured tool whose handler receives the validated
    /// arguments (auth context included) as one combined object.
    ///
    /// Registration is synchronous and happens once at startup. The
    /// caller's `schema` is merged with the auth-context field; the
    /// input is never mutated.
    ///
    /// # Errors
    ///
    /// Configuration errors only: a schema that declares the reserved
    /// `authContext` field or is not a JSON object schema.
    pub fn secure_tool<H, F>(
        &mut self,
        name: &str,
        description: &str,
        schema: &Value,
        annotations: Option<ToolAnnotations>,
        handler: H,
    ) -> Result<()>
    where
        H: Fn(Map<String, Value>) -> F + Send + Sync + 'static,
        F: Future<Output = Option<CallToolResult>> + Send + 'static,
    {
        let input_schema = secure_input_schema(name, schema)?;
        let handler: ForwardHandler = Arc::new(move |args| Box::pin(handler(args)));
        self.entries.push((
            make_tool(name, description, input_schema, annotations),
            SecureHandler::Forward(handler),
        ));
        Ok(())
    }

    /// Register a secured tool whose handler runs only after the bearer
    /// token presented with the call has been decoded.
    ///
    /// The handler receives the decoded claims alongside the validated
    /// arguments; it is never invoked when the token is missing or
    /// malformed.
    ///
    /// # Errors
    ///
    /// Configuration errors only, as for [`SecureTools::secure_tool`].
    pub fn secure_tool_with_auth<H, F>(
        &mut self,
        name: &str,
        description: &str,
        schema: &Value,
        annotations: Option<ToolAnnotations>,
        handler: H,
    ) -> Result<()>
    where
        H: Fn(Map<String, Value>, Claims) -> F + Send + Sync + 'static,
        F: Future<Output = HandlerResult> + Send + 'static,
    {
        let input_schema = secure_input_schema(name, schema)?;
        let handler: AuthHandler = Arc::new(move |args, claims| Box::pin(handler(args, claims)));
        self.entries.push((
            make_tool(name, description, input_schema, annotations),
            SecureHandler::Authenticated(handler),
        ));
        Ok(())
    }
}

impl Default for SecureTools {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureToolRegistry for SecureTools {
    fn tools(&self) -> Vec<Tool> {
        self.entries.iter().map(|(tool, _)| tool.clone()).collect()
    }

    fn call(
        &self,
        name: &str,
        args: Map<String, Value>,
        ctx: CallContext,
    ) -> Option<HandlerFuture> {
        let (tool, handler) = self.entries.iter().find(|(tool, _)| tool.name == name)?;
        match handler {
            SecureHandler::Forward(h) => Some(dispatch_forward(h, args)),
            SecureHandler::Authenticated(h) => {
                Some(dispatch_authenticated(h, &tool.name, args, ctx))
            }
        }
    }
}

fn make_tool(
    name: &str,
    description: &str,
    input_schema: Arc<Map<String, Value>>,
    annotations: Option<ToolAnnotations>,
) -> Tool {
    let mut tool = Tool::new(name.to_string(), description.to_string(), input_schema);
    tool.annotations = annotations;
    tool
}

// ============================================================================
// Tests
// ============================================================================
