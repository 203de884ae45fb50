//! Validation report assembly and rendering.
//!
//! The report collects the plan summary, per-provider registry findings,
//! and every warning accumulated along the way, then renders the
//! plain-text document written at the end of a `validate` run. Degraded
//! conditions never abort report generation; they show up as warnings and
//! "unable to determine" entries instead.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::plan::ChangeSummary;
use crate::providers::ProviderRef;
use crate::registry::{ModuleInfo, Registry};

/// Registry findings for a single provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderFinding {
    /// The provider these findings are for.
    pub provider: ProviderRef,
    /// Latest published version, when the registry knew one.
    pub latest_version: Option<String>,
    /// Recommended modules, possibly empty.
    pub modules: Vec<ModuleInfo>,
}

/// A complete validation report.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Summary of the plan's resource changes.
    pub summary: ChangeSummary,
    /// Per-provider findings, in reconciled provider order.
    pub findings: Vec<ProviderFinding>,
    /// Warnings accumulated during the run.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Creates an empty report around a change summary.
    #[must_use]
    pub fn new(summary: ChangeSummary) -> Self {
        Self {
            generated_at: Utc::now(),
            summary,
            findings: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Records a warning.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Records findings with no registry data for every provider.
    ///
    /// Used when lookups are skipped or the handshake failed: the
    /// providers still appear in the report, marked unknown.
    pub fn push_unchecked(&mut self, providers: &[ProviderRef]) {
        for provider in providers {
            self.findings.push(ProviderFinding {
                provider: provider.clone(),
                latest_version: None,
                modules: Vec::new(),
            });
        }
    }

    /// Looks up registry metadata for every provider.
    ///
    /// Lookup failures are downgraded to warnings; each provider always
    /// ends up with a finding.
    pub async fn collect_findings(
        &mut self,
        registry: &dyn Registry,
        providers: &[ProviderRef],
        modules_limit: usize,
    ) {
        for provider in providers {
            let latest_version = match registry
                .latest_provider_version(&provider.namespace, &provider.name)
                .await
            {
                Ok(version) => version,
                Err(e) => {
                    warn!("Version lookup failed for {provider}: {e}");
                    self.warnings
                        .push(format!("Version lookup failed for {provider}: {e}"));
                    None
                }
            };

            let modules = match registry.search_modules(&provider.name, modules_limit).await {
                Ok(modules) => modules,
                Err(e) => {
                    warn!("Module search failed for {provider}: {e}");
                    self.warnings
                        .push(format!("Module search failed for {provider}: {e}"));
                    Vec::new()
                }
            };

            self.findings.push(ProviderFinding {
                provider: provider.clone(),
                latest_version,
                modules,
            });
        }
    }

    /// Renders the plain-text report document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# Terraform Plan Validation Report");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "## Plan Summary");
        let _ = writeln!(out);
        let _ = writeln!(out, "- Total Resources: {}", self.summary.total_resources());
        let _ = writeln!(out, "- Actions:");
        let _ = writeln!(out, "  - Create: {}", self.summary.counts.create);
        let _ = writeln!(out, "  - Update: {}", self.summary.counts.update);
        let _ = writeln!(out, "  - Delete: {}", self.summary.counts.delete);
        let _ = writeln!(out, "  - Replace: {}", self.summary.counts.replace);
        let _ = writeln!(out);

        let _ = writeln!(out, "## Provider Validation");
        let _ = writeln!(out);

        if self.findings.is_empty() {
            let _ = writeln!(out, "No providers found.");
            let _ = writeln!(out);
        }

        for finding in &self.findings {
            let _ = writeln!(out, "### {}", finding.provider);
            let _ = writeln!(out);

            match &finding.latest_version {
                Some(version) => {
                    let _ = writeln!(out, "- Latest Version: `{version}`");
                }
                None => {
                    let _ = writeln!(out, "- Latest Version: Unable to determine");
                }
            }

            if finding.modules.is_empty() {
                let _ = writeln!(out, "- Recommended Modules: None found");
            } else {
                let _ = writeln!(out, "- Recommended Modules:");
                for module in &finding.modules {
                    let _ = writeln!(out, "  - {} ({})", module.name, module.source);
                }
            }
            let _ = writeln!(out);
        }

        if !self.warnings.is_empty() {
            let _ = writeln!(out, "## Warnings");
            let _ = writeln!(out);
            for warning in &self.warnings {
                let _ = writeln!(out, "- {warning}");
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "## Recommendations");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "1. Review provider versions to ensure you're using the latest stable releases."
        );
        let _ = writeln!(
            out,
            "2. Consider using recommended modules from the Terraform Registry."
        );
        let _ = writeln!(
            out,
            "3. Verify resource configurations against the latest provider documentation."
        );

        out
    }
}
