//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Plancheck - Terraform plan provider validation.
#[derive(Parser, Debug)]
#[command(name = "plancheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the plan's providers and write the report.
    Validate {
        /// Path to the plan JSON file.
        #[arg(short, long, default_value = "tfplan.json", env = "PLANCHECK_PLAN")]
        plan: PathBuf,

        /// Directory scanned for provider declarations when the plan is
        /// unusable.
        #[arg(short, long, default_value = ".", env = "PLANCHECK_DIR")]
        dir: PathBuf,

        /// Report output path.
        #[arg(short, long, default_value = "validation_report.txt")]
        report: PathBuf,

        /// Maximum recommended modules per provider.
        #[arg(long, default_value = "3")]
        modules_limit: usize,

        /// Per-request registry timeout in seconds.
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Skip registry lookups entirely.
        #[arg(long)]
        offline: bool,

        /// Override the MCP server command (whitespace-separated).
        #[arg(long, env = "PLANCHECK_MCP_COMMAND")]
        mcp_command: Option<String>,
    },

    /// List the providers the plan depends on.
    Providers {
        /// Path to the plan JSON file.
        #[arg(short, long, default_value = "tfplan.json", env = "PLANCHECK_PLAN")]
        plan: PathBuf,

        /// Directory scanned for provider declarations when the plan is
        /// unusable.
        #[arg(short, long, default_value = ".", env = "PLANCHECK_DIR")]
        dir: PathBuf,
    },

    /// Summarize the plan's resource changes.
    Summary {
        /// Path to the plan JSON file.
        #[arg(short, long, default_value = "tfplan.json", env = "PLANCHECK_PLAN")]
        plan: PathBuf,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
