//! Error types for the plancheck validation pipeline.
//!
//! This module provides the error hierarchy for all stages of a validation
//! run: plan reading, provider extraction, registry metadata lookups, and
//! report generation.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for plancheck operations.
#[derive(Debug, Error)]
pub enum PlancheckError {
    /// Plan reading or validation errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Registry metadata errors.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while reading and validating a plan document.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file was not found.
    #[error("Plan file not found: {path}")]
    NotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The plan file could not be parsed as JSON.
    #[error("Failed to parse plan: {message}")]
    MalformedJson {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// The plan parsed but is semantically empty or incomplete.
    #[error("Plan is structurally invalid: {reason}")]
    StructurallyInvalid {
        /// Description of what is missing.
        reason: String,
    },
}

/// Errors raised by the metadata registry client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The server process could not be started.
    #[error("Failed to spawn MCP server: {message}")]
    Spawn {
        /// Description of the spawn failure.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("MCP request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout that was exceeded.
        timeout_secs: u64,
    },

    /// The server process exited with a failure status.
    #[error("MCP server exited with status {code}: {stderr}")]
    ServerExit {
        /// Process exit code.
        code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// The response could not be understood.
    #[error("Malformed MCP response: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// The server returned a JSON-RPC error object.
    #[error("MCP server returned error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },
}

/// Result type alias for plancheck operations.
pub type Result<T> = std::result::Result<T, PlancheckError>;

impl PlancheckError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error directs the caller to the file-based
    /// provider scan instead of aborting.
    #[must_use]
    pub const fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            Self::Plan(PlanError::MalformedJson { .. } | PlanError::StructurallyInvalid { .. })
        )
    }

    /// Returns true if this error must terminate the run.
    ///
    /// Only a missing primary input file is fatal; every other condition
    /// degrades to a warning in the report.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Plan(PlanError::NotFound { .. }))
    }
}

impl PlanError {
    /// Creates a malformed-JSON error without a source location.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJson {
            message: message.into(),
            location: None,
        }
    }

    /// Creates a structural-validity error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::StructurallyInvalid {
            reason: reason.into(),
        }
    }
}

impl RegistryError {
    /// Creates a spawn error with the given message.
    #[must_use]
    pub fn spawn(message: impl Into<String>) -> Self {
        Self::Spawn {
            message: message.into(),
        }
    }

    /// Creates a protocol error with the given message.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}
