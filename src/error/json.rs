use crate::error::app_error::ClientError;
use serde_json::Value;
use tracing::{debug, warn};

const BODY_PREVIEW_LIMIT: usize = 500;

/// Parses a 2xx response body. An empty body is treated as JSON `null`.
///
/// Parse failures are logged with the position and category reported by
/// `serde_json` plus a truncated preview of the body.
pub fn parse_success_body(path: &str, body: &str) -> Result<Value, ClientError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str::<Value>(body).map_err(|e| {
        warn!(
            path = %path,
            error_message = %e,
            error_line = e.line(),
            error_column = e.column(),
            error_category = ?e.classify(),
            response_body = %body_preview(body),
            "Failed to parse JSON response body"
        );
        ClientError::invalid_response(path, e)
    })
}

/// Extracts a human-readable message from a failed response.
///
/// Tries a JSON `error` field, then `message`, then the raw text. An empty body
/// falls back to a generic status line.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            for key in ["error", "message"] {
                match map.get(key) {
                    Some(Value::String(message)) if !message.trim().is_empty() => return message.clone(),
                    Some(Value::Null) | None => continue,
                    Some(Value::String(_)) => continue,
                    Some(other) => return other.to_string(),
                }
            }
        }
        Ok(_) => {}
        Err(e) => {
            debug!(status, error_message = %e, "error body is not JSON, using raw text");
        }
    }

    let text = body.trim();
    if text.is_empty() {
        format!("Server error: {}", status)
    } else {
        text.to_string()
    }
}

fn body_preview(body: &str) -> String {
    if body.len() <= BODY_PREVIEW_LIMIT {
        return body.to_string();
    }

    let mut end = BODY_PREVIEW_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_error_field() {
        let body = r#"{"error": "Warehouse not found", "message": "ignored"}"#;
        assert_eq!(error_message_from_body(404, body), "Warehouse not found");
    }

    #[test]
    fn falls_back_to_message_field() {
        let body = r#"{"message": "Capacity must be positive"}"#;
        assert_eq!(error_message_from_body(400, body), "Capacity must be positive");
    }

    #[test]
    fn falls_back_to_raw_text() {
        assert_eq!(error_message_from_body(502, "Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message_from_body(500, r#"{"detail": "x"}"#), r#"{"detail": "x"}"#);
    }

    #[test]
    fn empty_body_uses_status_line() {
        assert_eq!(error_message_from_body(503, ""), "Server error: 503");
        assert_eq!(error_message_from_body(500, r#"{"error": null}"#), r#"{"error": null}"#);
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(parse_success_body("/alerts/resolve-all", "").unwrap(), Value::Null);
        assert_eq!(parse_success_body("/warehouses", r#"{"warehouses": []}"#).unwrap(), json!({"warehouses": []}));
    }

    #[test]
    fn malformed_success_body_is_invalid_response() {
        let err = parse_success_body("/warehouses", "<html>oops</html>").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { ref path, .. } if path == "/warehouses"));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let preview = body_preview(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LIMIT + 3);
    }
}
