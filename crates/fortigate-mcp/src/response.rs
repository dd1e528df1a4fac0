//! Conversion of handler results into tool results.

use fortigate_core::Result;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tracing::{error, warn};

/// The JSON mapping a tool answers with: the value itself on success, the
/// uniform error response on failure.
#[must_use]
pub fn to_json(result: Result<Value>) -> Value {
    match result {
        Ok(value) => value,
        Err(err) => err.into_error_response().to_value(),
    }
}

/// Wrap a handler result as an MCP tool result.
///
/// Failures are flagged with `is_error` but are still regular results, so the
/// calling agent sees the error mapping rather than a protocol fault.
#[must_use]
pub fn into_call_result(tool: &str, result: Result<Value>) -> CallToolResult {
    match result {
        Ok(value) => CallToolResult::success(vec![Content::text(render(&value))]),
        Err(err) => {
            if err.should_log() {
                error!(tool, code = err.error_code(), "{err}");
            } else {
                warn!(tool, code = err.error_code(), "{err}");
            }
            let body = err.into_error_response().to_value();
            CallToolResult::error(vec![Content::text(render(&body))])
        }
    }
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortigate_core::Error;
    use rmcp::model::RawContent;
    use serde_json::json;

    fn text(result: &CallToolResult) -> Value {
        match &result.content[0].raw {
            RawContent::Text(text) => serde_json::from_str(&text.text).unwrap(),
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn success_is_plain_mapping() {
        let result = into_call_result("list_policies", Ok(json!({"policies": [], "count": 0})));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text(&result), json!({"policies": [], "count": 0}));
    }

    #[test]
    fn remote_error_keeps_details() {
        let result = into_call_result(
            "get_interfaces",
            Err(Error::remote(500, r#"{"error":"internal"}"#)),
        );
        assert_eq!(result.is_error, Some(true));
        let body = text(&result);
        assert_eq!(body["details"], json!({"error": "internal"}));
        assert!(body["error"].as_str().unwrap().contains("500"));
    }

    #[test]
    fn input_error_has_only_error_key() {
        let body = to_json(Err(Error::InvalidInput("missing 'name'".into())));
        let map = body.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map["error"].as_str().unwrap().contains("missing 'name'"));
    }
}
