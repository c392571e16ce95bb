//! Shared business logic: framework-agnostic pure functions.
//!
//! Route handlers stay thin adapters: they pull bytes and path segments out
//! of the request and hand them to these functions.

use serde_json::Value;

use crate::ServiceError;

// ─── Request bodies ─────────────────────────────────────────────────────────

/// Parse a request body as JSON. Empty or malformed bodies are a bad request.
pub fn load_json_body(body: &[u8]) -> Result<Value, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::BadRequest("request body is empty".into()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::BadRequest(format!("invalid JSON body: {e}")))
}

// ─── Rotation flag ──────────────────────────────────────────────────────────

/// Extract the required `in_rotation` field from a parsed request body.
///
/// `null` counts as missing. Non-object bodies have no fields at all.
pub fn extract_in_rotation(data: &Value) -> Result<bool, ServiceError> {
    match data.get("in_rotation") {
        None | Some(Value::Null) => Err(ServiceError::BadRequest(
            "incomplete data: missing field \"in_rotation\"".into(),
        )),
        Some(value) => coerce_in_rotation(value),
    }
}

/// Coerce a rotation flag value to a boolean.
///
/// Accepted: `true`, `false`, `0`, `1`, and the strings `"0"`, `"1"`,
/// `"true"`, `"false"` (trimmed, case-insensitive).
pub fn coerce_in_rotation(value: &Value) -> Result<bool, ServiceError> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| {
        ServiceError::BadRequest(format!(
            "invalid value for \"in_rotation\": {value} (expected 0, 1, true or false)"
        ))
    })
}

/// Storage representation of the rotation flag.
pub fn rotation_flag(in_rotation: bool) -> i64 {
    i64::from(in_rotation)
}
