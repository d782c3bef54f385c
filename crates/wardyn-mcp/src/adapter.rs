//! Callback adaptation for secured tools.
//!
//! Two wrappers bridge user handlers onto the framework calling
//! convention `(validated args, invocation context) -> result`:
//!
//! - forward dispatch passes the validated arguments (auth context
//!   included) straight through as one combined object, substituting a
//!   default success envelope when the handler produces nothing;
//! - authenticated dispatch extracts and decodes the bearer token
//!   carried by the invocation before the handler runs, handing the
//!   decoded claims to the handler alongside the arguments.
//!
//! Every per-call failure is converted into an error `CallToolResult`
//! here; the hosting framework never sees an error from a secured tool.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::HeaderMap;
use rmcp::model::{CallToolResult, Content, ErrorData};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use wardyn_auth::{bearer_from_headers, decode_token, AuthError, Claims};

/// Message returned to callers for every failed secured invocation.
///
/// Missing tokens, malformed tokens, and handler failures all map to
/// this one message; the distinction lives in the operational log only.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Invalid or missing access token.";

/// Boxed future produced by a wrapped callback.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<CallToolResult, ErrorData>> + Send>>;

/// Boxed future returned by user handlers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Outcome of an authenticated handler invocation.
pub type HandlerResult = Result<CallToolResult, ErrorData>;

/// Handler that receives the validated arguments as one combined object.
pub type ForwardHandler =
    Arc<dyn Fn(Map<String, Value>) -> BoxFuture<Option<CallToolResult>> + Send + Sync>;

/// Handler that receives the validated arguments and the decoded claims.
pub type AuthHandler =
    Arc<dyn Fn(Map<String, Value>, Claims) -> BoxFuture<HandlerResult> + Send + Sync>;

/// Per-invocation context carrying the inbound request headers.
///
/// Hosting servers build this from the HTTP request parts the transport
/// layer attaches to each tool call.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    headers: HeaderMap,
}

impl CallContext {
    /// Create a context from raw headers.
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Create a context from HTTP request parts.
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            headers: parts.headers.clone(),
        }
    }

    /// The bearer token presented with this invocation, if any.
    pub fn bearer_token(&self) -> Option<String> {
        bearer_from_headers(&self.headers)
    }
}

/// Build the synthetic unauthorized result returned on failed calls.
pub fn unauthorized_result() -> CallToolResult {
    CallToolResult::error(vec![Content::text(UNAUTHORIZED_MESSAGE)])
}

/// Default envelope returned when a forward handler produces no result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    /// The validated arguments the handler was called with.
    pub data: Map<String, Value>,
    /// Always true; the call completed without a handler-built result.
    pub success: bool,
}

/// Run a forward handler with the validated arguments.
///
/// The arguments (including the framework-populated `authContext`
/// field) are handed to the handler as one combined object. A `None`
/// return is replaced by the default success envelope so a missing
/// return value never fails the call.
pub(crate) fn dispatch_forward(handler: &ForwardHandler, args: Map<String, Value>) -> HandlerFuture {
    let handler = Arc::clone(handler);
    Box::pin(async move {
        let envelope_args = args.clone();
        match handler(args).await {
            Some(result) => Ok(result),
            None => {
                let envelope = SuccessEnvelope {
                    data: envelope_args,
                    success: true,
                };
                let json = serde_json::to_string_pretty(&envelope)
                    .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
        }
    })
}

/// Run an authenticated handler behind the token gate.
///
/// The bearer token is taken from the invocation context and decoded
/// into claims before the handler runs; the handler is never invoked
/// without a successful decode. Missing tokens, malformed tokens, and
/// handler failures all produce the same unauthorized result — the
/// underlying cause is written to the log, not returned to the caller.
pub(crate) fn dispatch_authenticated(
    handler: &AuthHandler,
    tool: &str,
    args: Map<String, Value>,
    ctx: CallContext,
) -> HandlerFuture {
    let handler = Arc::clone(handler);
    let tool = tool.to_string();
    Box::pin(async move {
        let token = match ctx.bearer_token() {
            Some(token) => token,
            None => {
                log::warn!("tool '{tool}': {}", AuthError::MissingToken);
                return Ok(unauthorized_result());
            }
        };

        let claims = match decode_token(&token) {
            Ok(claims) => claims,
            Err(err) => {
                log::warn!("tool '{tool}': {err}");
                return Ok(unauthorized_result());
            }
        };

        match handler(args, claims).await {
            Ok(result) => Ok(result),
            Err(err) => {
                log::warn!("tool '{tool}': handler failed after auth: {err}");
                Ok(unauthorized_result())
            }
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use rmcp::model::RawContent;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn encode_segment(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn make_token(claims: &Value) -> String {
        format!(
            "{}.{}.{}",
            encode_segment(&json!({"alg": "RS256", "typ": "JWT"})),
            encode_segment(claims),
            URL_SAFE_NO_PAD.encode(b"sig"),
        )
    }

    fn ctx_with_auth(value: &str) -> CallContext {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, value.parse().unwrap());
        CallContext::new(headers)
    }

    fn sample_args() -> Map<String, Value> {
        match json!({"query": "rust", "limit": 5}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(t) => t.text.clone(),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    // -- CallContext --------------------------------------------------------

    #[test]
    fn test_call_context_bearer_token() {
        let ctx = ctx_with_auth("Bearer abc.def.ghi");
        assert_eq!(ctx.bearer_token(), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_call_context_default_has_no_token() {
        let ctx = CallContext::default();
        assert_eq!(ctx.bearer_token(), None);
    }

    #[test]
    fn test_call_context_from_parts() {
        let req = http::Request::builder()
            .header("Authorization", "Bearer abc.def.ghi")
            .body(())
            .unwrap();
        let (parts, _body) = req.into_parts();
        let ctx = CallContext::from_parts(&parts);
        assert_eq!(ctx.bearer_token(), Some("abc.def.ghi".to_string()));
    }

    // -- Unauthorized result ------------------------------------------------

    #[test]
    fn test_unauthorized_result_shape() {
        let result = unauthorized_result();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), UNAUTHORIZED_MESSAGE);
    }

    // -- Forward dispatch ---------------------------------------------------

    #[tokio::test]
    async fn test_forward_passes_handler_result_through() {
        let handler: ForwardHandler = Arc::new(|_args| {
            Box::pin(async move {
                Some(CallToolResult::success(vec![Content::text("done")]))
            })
        });

        let result = dispatch_forward(&handler, sample_args()).await.unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "done");
    }

    #[tokio::test]
    async fn test_forward_substitutes_success_envelope() {
        let handler: ForwardHandler = Arc::new(|_args| Box::pin(async move { None }));

        let result = dispatch_forward(&handler, sample_args()).await.unwrap();
        assert_eq!(result.is_error, Some(false));

        let envelope: Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["data"]["query"], "rust");
        assert_eq!(envelope["data"]["limit"], 5);
    }

    #[tokio::test]
    async fn test_forward_handler_sees_combined_args() {
        let captured = Arc::new(Mutex::new(None));
        let captured_clone = Arc::clone(&captured);
        let handler: ForwardHandler = Arc::new(move |args| {
            let captured = Arc::clone(&captured_clone);
            Box::pin(async move {
                *captured.lock().unwrap() = Some(args);
                None
            })
        });

        let mut args = sample_args();
        args.insert("authContext".to_string(), json!({"token": "abc.def.ghi"}));
        let _ = dispatch_forward(&handler, args).await.unwrap();

        let seen = captured.lock().unwrap();
        let seen = seen.as_ref().expect("handler should have run");
        assert_eq!(seen["query"], "rust");
        assert_eq!(seen["authContext"]["token"], "abc.def.ghi");
    }

    // -- Authenticated dispatch ---------------------------------------------

    /// Handler that counts invocations and captures the claims it saw.
    fn counting_handler(
        count: Arc<AtomicUsize>,
        captured: Arc<Mutex<Option<Claims>>>,
    ) -> AuthHandler {
        Arc::new(move |_args, claims| {
            let count = Arc::clone(&count);
            let captured = Arc::clone(&captured);
            Box::pin(async move {
                count.fetch_add(1, Ordering::SeqCst);
                *captured.lock().unwrap() = Some(claims);
                Ok(CallToolResult::success(vec![Content::text("ok")]))
            })
        })
    }

    #[tokio::test]
    async fn test_authenticated_valid_token_reaches_handler() {
        let count = Arc::new(AtomicUsize::new(0));
        let captured = Arc::new(Mutex::new(None));
        let handler = counting_handler(Arc::clone(&count), Arc::clone(&captured));

        let token = make_token(&json!({"sub": "user_123"}));
        let ctx = ctx_with_auth(&format!("Bearer {token}"));

        let result = dispatch_authenticated(&handler, "search", sample_args(), ctx)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let claims = captured.lock().unwrap();
        let claims = claims.as_ref().expect("claims should be captured");
        assert_eq!(claims["sub"], "user_123");
    }

    #[tokio::test]
    async fn test_authenticated_missing_header_skips_handler() {
        let count = Arc::new(AtomicUsize::new(0));
        let captured = Arc::new(Mutex::new(None));
        let handler = counting_handler(Arc::clone(&count), captured);

        let result =
            dispatch_authenticated(&handler, "search", sample_args(), CallContext::default())
                .await
                .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), UNAUTHORIZED_MESSAGE);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authenticated_empty_bearer_skips_handler() {
        let count = Arc::new(AtomicUsize::new(0));
        let captured = Arc::new(Mutex::new(None));
        let handler = counting_handler(Arc::clone(&count), captured);

        let ctx = ctx_with_auth("Bearer   ");
        let result = dispatch_authenticated(&handler, "search", sample_args(), ctx)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authenticated_malformed_token_skips_handler() {
        let count = Arc::new(AtomicUsize::new(0));
        let captured = Arc::new(Mutex::new(None));
        let handler = counting_handler(Arc::clone(&count), captured);

        let ctx = ctx_with_auth("Bearer not-a-token");
        let result = dispatch_authenticated(&handler, "search", sample_args(), ctx)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), UNAUTHORIZED_MESSAGE);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authenticated_handler_failure_maps_to_unauthorized() {
        let handler: AuthHandler = Arc::new(|_args, _claims| {
            Box::pin(async move {
                Err(ErrorData::internal_error("backend unavailable", None))
            })
        });

        let token = make_token(&json!({"sub": "user_123"}));
        let ctx = ctx_with_auth(&format!("Bearer {token}"));

        let result = dispatch_authenticated(&handler, "search", sample_args(), ctx)
            .await
            .unwrap();
        // Indistinguishable from an auth failure, matching the missing-token path.
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), UNAUTHORIZED_MESSAGE);
    }
}
