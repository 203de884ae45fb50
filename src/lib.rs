// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Plancheck
//!
//! Terraform plan provider validation against the Terraform Registry via the
//! HashiCorp MCP server.
//!
//! ## Overview
//!
//! Plancheck reads a Terraform plan JSON document, determines the set of
//! providers it depends on, and checks each one against the registry:
//!
//! - Extract providers from declared configurations and resource type
//!   prefixes
//! - Fall back to scanning `.tf` files when the plan is missing or unusable
//! - Query an external MCP server (one subprocess per request) for the
//!   latest provider versions and recommended modules
//! - Write a plain-text validation report; degraded conditions become
//!   warnings, never aborts
//!
//! ## Architecture
//!
//! The pipeline is a single deterministic pass:
//!
//! 1. **Plan Reader**: loads and validates the plan document
//! 2. **Extractor / Scanner**: produces provider references from the plan,
//!    or from configuration files as fallback
//! 3. **Reconciler**: merges, normalizes, and deduplicates the providers
//! 4. **Registry client**: looks up metadata per provider
//! 5. **Report**: renders the findings and warnings
//!
//! ## Modules
//!
//! - [`plan`]: plan document model, loading, and change summarization
//! - [`providers`]: provider references, extraction, scanning, reconciliation
//! - [`registry`]: metadata service interface and MCP subprocess client
//! - [`report`]: validation report assembly and rendering
//! - [`cli`]: command-line interface
//! - [`error`]: error hierarchy
//!
//! ## Example
//!
//! ```no_run
//! use plancheck::providers::reconcile;
//!
//! let providers = reconcile("tfplan.json", ".");
//! for provider in &providers {
//!     println!("{provider}");
//! }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod error;
pub mod plan;
pub mod providers;
pub mod registry;
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormat, OutputFormatter};
pub use error::{PlanError, PlancheckError, RegistryError, Result};
pub use plan::{ChangeSummary, PlanDocument, read_plan};
pub use providers::{ProviderRef, extract_from_plan, reconcile, scan_directory};
pub use registry::{McpClient, McpConfig, ModuleInfo, Registry};
pub use report::{ProviderFinding, ValidationReport};
