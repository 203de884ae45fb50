//! JSON-RPC 2.0 envelope types for the MCP transport.
//!
//! Only the client side is modeled: requests are serialized, responses
//! deserialized. The protocol itself belongs to the external server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request envelope.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always `"2.0"`.
    pub jsonrpc: String,
    /// Request id, unique per client instance.
    pub id: u64,
    /// Method name.
    pub method: String,
    /// Method parameters, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request envelope.
    #[must_use]
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version as reported by the server.
    #[serde(default)]
    pub jsonrpc: String,
    /// Id echoed from the request.
    #[serde(default)]
    pub id: Option<Value>,
    /// Successful result payload.
    #[serde(default)]
    pub result: Option<Value>,
    /// Error payload, mutually exclusive with `result`.
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
pub struct JsonRpcErrorObject {
    /// Error code.
    pub code: i64,
    /// Error message.
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new(
            7,
            "get_latest_provider_version",
            Some(json!({"namespace": "hashicorp", "name": "aws"})),
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "get_latest_provider_version");
        assert_eq!(value["params"]["name"], "aws");
    }

    #[test]
    fn test_request_omits_absent_params() {
        let request = JsonRpcRequest::new(1, "ping", None);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("params").is_none());
    }

    #[test]
    fn test_response_with_result() {
        let response: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc": "2.0", "id": 1, "result": {"version": "5.1.0"}}"#,
        )
        .unwrap();

        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap()["version"], "5.1.0");
    }

    #[test]
    fn test_response_with_error() {
        let response: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "method not found"}}"#,
        )
        .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "method not found");
    }
}
