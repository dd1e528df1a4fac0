//! Shared test helpers for fortigate-mcp tests.

#![allow(dead_code)]

use fortigate_core::Result;
use fortigate_mcp::response::{into_call_result, to_json};
use rmcp::model::{CallToolResult, RawContent};
use serde_json::Value;

/// Extract the text content from a CallToolResult.
pub fn get_text(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "Expected exactly one content item");
    match &result.content[0].raw {
        RawContent::Text(text_content) => text_content.text.clone(),
        _ => panic!("Expected text content"),
    }
}

/// Parse the JSON mapping carried by a CallToolResult.
pub fn get_json(result: &CallToolResult) -> Value {
    serde_json::from_str(&get_text(result)).expect("tool output is JSON")
}

/// Check if the result is a success.
pub fn is_success(result: &CallToolResult) -> bool {
    result.is_error == Some(false)
}

/// Check if the result is an error.
pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

/// Convert a handler result the way the server does.
pub fn as_tool_result(result: Result<Value>) -> CallToolResult {
    into_call_result("test", result)
}

/// Error mapping for a failed handler result.
pub fn error_body(result: Result<Value>) -> Value {
    assert!(result.is_err(), "expected a failure, got {result:?}");
    to_json(result)
}
