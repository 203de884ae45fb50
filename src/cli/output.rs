//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying validation
//! results to the user in text or JSON form. The plain-text report file
//! is rendered by [`crate::report::ValidationReport::render`]; this is
//! the terminal-facing view.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::plan::ChangeSummary;
use crate::providers::ProviderRef;
use crate::report::ValidationReport;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Resource change row for table display.
#[derive(Tabled)]
struct ResourceChangeRow {
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

/// Provider finding row for table display.
#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Latest Version")]
    version: String,
    #[tabled(rename = "Modules")]
    modules: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a change summary for display.
    #[must_use]
    pub fn format_summary(&self, summary: &ChangeSummary) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Text => Self::format_summary_text(summary),
        }
    }

    /// Formats a summary as text.
    fn format_summary_text(summary: &ChangeSummary) -> String {
        if summary.is_empty() {
            return format!("{} Plan proposes no resource changes.\n", "✓".green());
        }

        let mut output = String::new();
        let _ = write!(
            output,
            "\nResource changes ({}):\n\n",
            summary.total_resources()
        );

        let rows: Vec<ResourceChangeRow> = summary
            .resources
            .iter()
            .map(|row| ResourceChangeRow {
                resource_type: row.resource_type.clone(),
                name: row.name.clone(),
                actions: row.actions.join(", "),
            })
            .collect();

        let table = Table::new(rows).to_string();
        output.push_str(&table);
        output.push('\n');

        let _ = write!(
            output,
            "\nPlan: {} to create, {} to update, {} to delete, {} to replace\n",
            summary.counts.create.to_string().green(),
            summary.counts.update.to_string().yellow(),
            summary.counts.delete.to_string().red(),
            summary.counts.replace.to_string().yellow(),
        );

        output
    }

    /// Formats a reconciled provider list for display.
    #[must_use]
    pub fn format_providers(&self, providers: &[ProviderRef]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(providers).unwrap_or_default(),
            OutputFormat::Text => {
                if providers.is_empty() {
                    return format!("{} No providers found.\n", "⚠".yellow());
                }

                let mut output = format!("Providers ({}):\n", providers.len());
                for provider in providers {
                    let _ = writeln!(output, "  - {provider}");
                }
                output
            }
        }
    }

    /// Formats a validation report for terminal display.
    #[must_use]
    pub fn format_report(&self, report: &ValidationReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_report_text(report),
        }
    }

    /// Formats a report as text.
    fn format_report_text(report: &ValidationReport) -> String {
        let mut output = String::new();

        let _ = write!(
            output,
            "\nPlan: {} resources ({} create, {} update, {} delete, {} replace)\n",
            report.summary.total_resources(),
            report.summary.counts.create,
            report.summary.counts.update,
            report.summary.counts.delete,
            report.summary.counts.replace,
        );

        if report.findings.is_empty() {
            let _ = write!(output, "\n{} No providers found.\n", "⚠".yellow());
        } else {
            output.push('\n');
            let rows: Vec<FindingRow> = report
                .findings
                .iter()
                .map(|finding| FindingRow {
                    provider: finding.provider.to_string(),
                    version: finding.latest_version.clone().map_or_else(
                        || "unknown".dimmed().to_string(),
                        |version| version.green().to_string(),
                    ),
                    modules: if finding.modules.is_empty() {
                        "-".to_string()
                    } else {
                        finding
                            .modules
                            .iter()
                            .map(|module| module.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    },
                })
                .collect();

            let table = Table::new(rows).to_string();
            output.push_str(&table);
            output.push('\n');
        }

        if !report.warnings.is_empty() {
            let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
            for warning in &report.warnings {
                let _ = writeln!(output, "   - {warning}");
            }
        }

        output
    }
}
