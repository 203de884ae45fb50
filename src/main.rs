//! Plancheck CLI entrypoint.
//!
//! This is the main entrypoint for the plancheck command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use plancheck::cli::{Cli, Commands, OutputFormatter};
use plancheck::error::{PlanError, PlancheckError, Result};
use plancheck::plan::{ChangeSummary, read_plan};
use plancheck::providers::{ProviderRef, reconcile};
use plancheck::registry::{McpClient, McpConfig, Registry};
use plancheck::report::ValidationReport;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // Load .env before clap resolves environment-backed arguments.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Validate {
            plan,
            dir,
            report,
            modules_limit,
            timeout_secs,
            offline,
            mcp_command,
        } => {
            let options = ValidateOptions {
                plan,
                dir,
                report,
                modules_limit,
                timeout_secs,
                offline,
                mcp_command,
            };
            cmd_validate(&options, &formatter).await
        }
        Commands::Providers { plan, dir } => cmd_providers(&plan, &dir, &formatter),
        Commands::Summary { plan } => cmd_summary(&plan, &formatter),
    }
}

/// Options for the `validate` command.
struct ValidateOptions {
    /// Path to the plan JSON file.
    plan: PathBuf,
    /// Fallback directory for provider declarations.
    dir: PathBuf,
    /// Report output path.
    report: PathBuf,
    /// Maximum recommended modules per provider.
    modules_limit: usize,
    /// Per-request registry timeout in seconds.
    timeout_secs: u64,
    /// Skip registry lookups entirely.
    offline: bool,
    /// MCP server command override.
    mcp_command: Option<String>,
}

/// Run the full validation pipeline and write the report.
async fn cmd_validate(options: &ValidateOptions, formatter: &OutputFormatter) -> Result<()> {
    // A completely absent plan file is the one fatal input condition;
    // every other degraded state ends in a report with warnings.
    if !options.plan.exists() {
        return Err(PlancheckError::Plan(PlanError::NotFound {
            path: options.plan.clone(),
        }));
    }

    let mut warnings: Vec<String> = Vec::new();

    let summary = match read_plan(&options.plan) {
        Ok(doc) => ChangeSummary::from_plan(&doc),
        Err(e) => {
            warn!("Plan unusable: {e}");
            warnings.push(format!(
                "Plan file could not be used ({e}); providers were taken from configuration files in {}",
                options.dir.display()
            ));
            ChangeSummary::default()
        }
    };

    let providers = reconcile(&options.plan, &options.dir);
    if providers.is_empty() {
        warnings.push("No providers found in the plan or configuration files".to_string());
    }

    let mut report = ValidationReport::new(summary);
    for warning in warnings {
        report.push_warning(warning);
    }

    if options.offline {
        info!("Offline mode; skipping registry lookups");
        report.push_warning("Registry lookups skipped (offline mode)");
        report.push_unchecked(&providers);
    } else {
        lookup_metadata(options, &providers, &mut report).await;
    }

    std::fs::write(&options.report, report.render())?;

    eprintln!("{}", formatter.format_report(&report));
    eprintln!("Report written to: {}", options.report.display());

    Ok(())
}

/// Queries the registry for every provider, degrading to warnings.
async fn lookup_metadata(
    options: &ValidateOptions,
    providers: &[ProviderRef],
    report: &mut ValidationReport,
) {
    let mut config = McpConfig::default().with_timeout(options.timeout_secs);
    if let Some(command_line) = options.mcp_command.as_deref() {
        config = config.with_command_line(command_line);
    }
    let client = McpClient::new(config);

    info!("Initializing MCP server connection");
    match client.initialize().await {
        Ok(()) => {
            report
                .collect_findings(&client, providers, options.modules_limit)
                .await;
        }
        Err(e) => {
            warn!("Registry handshake failed: {e}");
            report.push_warning(format!(
                "Registry unavailable ({e}); provider versions and modules were not checked"
            ));
            report.push_unchecked(providers);
        }
    }
}

/// List the providers the plan depends on.
fn cmd_providers(plan: &Path, dir: &Path, formatter: &OutputFormatter) -> Result<()> {
    let providers = reconcile(plan, dir);
    eprintln!("{}", formatter.format_providers(&providers));
    Ok(())
}

/// Summarize the plan's resource changes.
fn cmd_summary(plan: &Path, formatter: &OutputFormatter) -> Result<()> {
    match read_plan(plan) {
        Ok(doc) => {
            let summary = ChangeSummary::from_plan(&doc);
            eprintln!("{}", formatter.format_summary(&summary));
            Ok(())
        }
        Err(e @ PlanError::NotFound { .. }) => Err(e.into()),
        Err(e) => {
            warn!("Plan unusable: {e}");
            eprintln!("{}", formatter.format_summary(&ChangeSummary::default()));
            Ok(())
        }
    }
}
