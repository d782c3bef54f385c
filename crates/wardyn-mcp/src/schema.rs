//! Auth-context schema construction and merging.
//!
//! Every secured tool's input schema gains one reserved field,
//! `authContext`, holding an object with a single required string field
//! `token`. Merging is non-destructive: caller schemas are never
//! mutated, and a caller schema that already declares `authContext` is
//! rejected at registration time.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// Reserved input-schema field carrying the auth context.
pub const AUTH_CONTEXT_KEY: &str = "authContext";

/// The fixed auth-context field schema: an object with a single
/// required string field `token`.
pub fn auth_context_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "token": { "type": "string" }
        },
        "required": ["token"]
    })
}

/// Merge a tool's parameter map with the auth-context field.
///
/// Returns a new map containing every caller entry plus
/// [`AUTH_CONTEXT_KEY`]; the input is left untouched.
///
/// # Errors
///
/// [`Error::ReservedField`] when the caller already declares
/// `authContext` — caller schemas must not use that name.
pub fn with_auth_context(tool: &str, params: &Map<String, Value>) -> Result<Map<String, Value>> {
    if params.contains_key(AUTH_CONTEXT_KEY) {
        return Err(Error::ReservedField {
            tool: tool.to_string(),
        });
    }

    let mut merged = params.clone();
    merged.insert(AUTH_CONTEXT_KEY.to_string(), auth_context_schema());
    Ok(merged)
}

/// Build the full input schema for a secured tool.
///
/// Takes the caller's JSON object schema (`{"type": "object",
/// "properties": {...}, ...}`), merges the auth-context field into its
/// properties, and marks `authContext` as required alongside whatever
/// the caller already required. An empty object schema is accepted for
/// tools without business parameters.
pub(crate) fn secure_input_schema(
    tool: &str,
    schema: &Value,
) -> Result<Arc<Map<String, Value>>> {
    let mut full = match schema {
        Value::Object(map) => map.clone(),
        _ => {
            return Err(Error::InvalidSchema {
                tool: tool.to_string(),
            })
        }
    };

    let params = match full.get("properties") {
        Some(Value::Object(props)) => props.clone(),
        Some(_) => {
            return Err(Error::InvalidSchema {
                tool: tool.to_string(),
            })
        }
        None => Map::new(),
    };

    let merged = with_auth_context(tool, &params)?;
    full.insert("type".to_string(), json!("object"));
    full.insert("properties".to_string(), Value::Object(merged));

    match full.get_mut("required") {
        Some(Value::Array(list)) => {
            if !list.iter().any(|v| v.as_str() == Some(AUTH_CONTEXT_KEY)) {
                list.push(json!(AUTH_CONTEXT_KEY));
            }
        }
        Some(_) => {
            return Err(Error::InvalidSchema {
                tool: tool.to_string(),
            })
        }
        None => {
            full.insert("required".to_string(), json!([AUTH_CONTEXT_KEY]));
        }
    }

    Ok(Arc::new(full))
}

// ============================================================================
// Tests
// ============================================================================
