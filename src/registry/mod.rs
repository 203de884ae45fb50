//! Metadata registry collaborator.
//!
//! The validator needs two lookups from the outside world: the latest
//! published version of a provider and a module search. Both are served
//! by an external MCP server; this module defines the interface the rest
//! of the crate programs against and the subprocess-backed client.

mod mcp;
mod protocol;

pub use mcp::{McpClient, McpConfig};
pub use protocol::{JSONRPC_VERSION, JsonRpcErrorObject, JsonRpcRequest, JsonRpcResponse};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Module metadata returned by a registry search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module name.
    #[serde(default)]
    pub name: String,
    /// Module source address.
    #[serde(default)]
    pub source: String,
}

/// Interface to the external provider metadata service.
///
/// Implementations are expected to be degradable: every error maps to
/// "metadata unavailable" at the report layer and never aborts a run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Performs the protocol handshake.
    ///
    /// # Errors
    ///
    /// Returns an error when the server is unreachable or reports no
    /// capabilities; the caller downgrades every subsequent lookup.
    async fn initialize(&self) -> Result<(), RegistryError>;

    /// Latest published version for a provider, if the registry knows one.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup cannot be completed.
    async fn latest_provider_version(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<String>, RegistryError>;

    /// Searches registry modules matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup cannot be completed.
    async fn search_modules(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ModuleInfo>, RegistryError>;
}
