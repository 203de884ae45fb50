//! Subprocess-backed MCP registry client.
//!
//! Each request spawns the configured server command, writes one JSON-RPC
//! line to its stdin, and reads one response line from its stdout. Every
//! call is bounded by a fixed timeout; the spawned process is killed when
//! the timeout cancels the exchange.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::RegistryError;

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use super::{ModuleInfo, Registry};

/// Default MCP server invocation.
const DEFAULT_SERVER_COMMAND: &[&str] = &[
    "docker",
    "run",
    "--rm",
    "-i",
    "hashicorp/terraform-mcp-server:latest",
];

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// MCP protocol version sent during the handshake.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Configuration for the MCP subprocess client.
#[derive(Debug, Clone)]
pub struct McpConfig {
    /// Command and arguments used to start the server.
    pub command: Vec<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_SERVER_COMMAND
                .iter()
                .map(ToString::to_string)
                .collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl McpConfig {
    /// Replaces the server command with a whitespace-separated command
    /// line (e.g. from an environment variable). An empty override keeps
    /// the current command.
    #[must_use]
    pub fn with_command_line(mut self, command_line: &str) -> Self {
        let parts: Vec<String> = command_line
            .split_whitespace()
            .map(ToString::to_string)
            .collect();
        if !parts.is_empty() {
            self.command = parts;
        }
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Subprocess-backed MCP registry client.
#[derive(Debug)]
pub struct McpClient {
    /// Client configuration.
    config: McpConfig,
    /// Request id counter, owned by this instance.
    next_id: AtomicU64,
}

impl McpClient {
    /// Creates a client with the given configuration.
    #[must_use]
    pub const fn new(config: McpConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
        }
    }

    /// Sends one request and returns the `result` payload.
    async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, RegistryError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        let payload = serde_json::to_string(&request)
            .map_err(|e| RegistryError::protocol(format!("Failed to encode request: {e}")))?;

        debug!(method, id, "MCP request");
        let timeout = Duration::from_secs(self.config.timeout_secs);
        match tokio::time::timeout(timeout, self.roundtrip(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(RegistryError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }),
        }
    }

    /// Spawns the server, performs one request/response exchange, and
    /// waits for the process to exit.
    async fn roundtrip(&self, payload: &str) -> Result<Value, RegistryError> {
        let (program, args) = self
            .config
            .command
            .split_first()
            .ok_or_else(|| RegistryError::spawn("empty server command"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RegistryError::spawn(format!("{program}: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RegistryError::spawn("failed to open server stdin"))?;
        stdin
            .write_all(payload.as_bytes())
            .await
            .map_err(|e| RegistryError::spawn(format!("failed to write request: {e}")))?;
        stdin
            .write_all(b"\n")
            .await
            .map_err(|e| RegistryError::spawn(format!("failed to write request: {e}")))?;
        // Close stdin so one-shot servers see EOF and terminate.
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RegistryError::spawn(format!("failed to collect output: {e}")))?;

        if !output.status.success() {
            return Err(RegistryError::ServerExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!(response = %stdout.trim(), "MCP response");

        let line = stdout
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| RegistryError::protocol("empty response from server"))?;

        let response: JsonRpcResponse = serde_json::from_str(line)
            .map_err(|e| RegistryError::protocol(format!("invalid JSON-RPC response: {e}")))?;

        if let Some(error) = response.error {
            return Err(RegistryError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl Registry for McpClient {
    async fn initialize(&self) -> Result<(), RegistryError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });

        let result = self.call("initialize", Some(params)).await?;
        if result.get("capabilities").is_some() {
            Ok(())
        } else {
            Err(RegistryError::protocol("server reported no capabilities"))
        }
    }

    async fn latest_provider_version(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<String>, RegistryError> {
        let params = json!({"namespace": namespace, "name": name});
        let result = self.call("get_latest_provider_version", Some(params)).await?;
        Ok(result
            .get("version")
            .and_then(Value::as_str)
            .map(ToString::to_string))
    }

    async fn search_modules(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ModuleInfo>, RegistryError> {
        let params = json!({"query": query, "limit": limit});
        let result = self.call("search_modules", Some(params)).await?;

        match result.get("modules") {
            None => Ok(Vec::new()),
            Some(modules) => serde_json::from_value(modules.clone())
                .map_err(|e| RegistryError::protocol(format!("invalid module list: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a client whose "server" is a short shell script.
    fn script_client(script: &str, timeout_secs: u64) -> McpClient {
        let config = McpConfig {
            command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            timeout_secs,
        };
        McpClient::new(config)
    }

    #[test]
    fn test_default_config_uses_docker_invocation() {
        let config = McpConfig::default();
        assert_eq!(config.command[0], "docker");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_command_line_override() {
        let config = McpConfig::default().with_command_line("mcp-server --stdio");
        assert_eq!(config.command, vec!["mcp-server", "--stdio"]);
    }

    #[test]
    fn test_empty_command_line_keeps_default() {
        let config = McpConfig::default().with_command_line("   ");
        assert_eq!(config.command[0], "docker");
    }

    #[tokio::test]
    async fn test_version_lookup_roundtrip() {
        let client = script_client(
            r#"cat >/dev/null; printf '{"jsonrpc":"2.0","id":1,"result":{"version":"5.1.0"}}\n'"#,
            5,
        );

        let version = client
            .latest_provider_version("hashicorp", "aws")
            .await
            .unwrap();
        assert_eq!(version.as_deref(), Some("5.1.0"));
    }

    #[tokio::test]
    async fn test_result_without_version_is_none() {
        let client = script_client(
            r#"cat >/dev/null; printf '{"jsonrpc":"2.0","id":1,"result":{}}\n'"#,
            5,
        );

        let version = client
            .latest_provider_version("hashicorp", "aws")
            .await
            .unwrap();
        assert!(version.is_none());
    }

    #[tokio::test]
    async fn test_module_search_roundtrip() {
        let client = script_client(
            r#"cat >/dev/null; printf '{"jsonrpc":"2.0","id":1,"result":{"modules":[{"name":"vpc","source":"terraform-aws-modules/vpc/aws"}]}}\n'"#,
            5,
        );

        let modules = client.search_modules("aws", 3).await.unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "vpc");
    }

    #[tokio::test]
    async fn test_rpc_error_is_surfaced() {
        let client = script_client(
            r#"cat >/dev/null; printf '{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"method not found"}}\n'"#,
            5,
        );

        let err = client
            .latest_provider_version("hashicorp", "aws")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Rpc { code: -32601, .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_server_exit() {
        let client = script_client(r#"cat >/dev/null; echo boom >&2; exit 3"#, 5);

        let err = client
            .latest_provider_version("hashicorp", "aws")
            .await
            .unwrap_err();
        match err {
            RegistryError::ServerExit { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected ServerExit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_response_is_protocol_error() {
        let client = script_client(r#"cat >/dev/null; echo not-json"#, 5);

        let err = client
            .latest_provider_version("hashicorp", "aws")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let client = script_client(r#"sleep 5"#, 1);

        let err = client
            .latest_provider_version("hashicorp", "aws")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Timeout { timeout_secs: 1 }));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let config = McpConfig {
            command: vec!["plancheck-no-such-binary".to_string()],
            timeout_secs: 5,
        };
        let client = McpClient::new(config);

        let err = client.initialize().await.unwrap_err();
        assert!(matches!(err, RegistryError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_request_ids_increment_per_instance() {
        let script =
            r#"cat >/dev/null; printf '{"jsonrpc":"2.0","id":1,"result":{"version":"1.0.0"}}\n'"#;
        let client = script_client(script, 5);

        let _ = client.latest_provider_version("hashicorp", "aws").await;
        let _ = client.latest_provider_version("hashicorp", "aws").await;
        assert_eq!(client.next_id.load(Ordering::Relaxed), 3);
    }
}
