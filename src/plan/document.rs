//! Typed model of a Terraform plan JSON document.
//!
//! Only the fields the validator consumes are modeled; everything else in
//! the document is ignored. A parsed document is read-only for the rest of
//! the run.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use crate::error::PlanError;

/// A parsed Terraform plan document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanDocument {
    /// Plan format version (e.g. `"1.2"`).
    #[serde(default)]
    pub format_version: Option<String>,
    /// Terraform version that produced the plan.
    #[serde(default)]
    pub terraform_version: Option<String>,
    /// Configuration section with declared provider requirements.
    #[serde(default)]
    pub configuration: Option<Configuration>,
    /// Proposed resource changes, in plan order.
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
    /// Planned values after apply.
    #[serde(default)]
    pub planned_values: Option<PlannedValues>,
}

/// The `configuration` section of a plan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Configuration {
    /// Declared provider configurations, keyed by provider key
    /// (possibly alias-qualified, e.g. `aws.us-east-1`).
    #[serde(default)]
    pub provider_configs: BTreeMap<String, ProviderConfigEntry>,
}

/// One entry under `configuration.provider_configs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfigEntry {
    /// Provider name as declared.
    #[serde(default)]
    pub name: Option<String>,
    /// Fully qualified `namespace/name`, when present.
    #[serde(default)]
    pub full_provider_name: Option<String>,
    /// Alias qualifier, when present.
    #[serde(default)]
    pub alias: Option<String>,
    /// Declared version constraint.
    #[serde(default)]
    pub version_constraint: Option<String>,
}

/// One proposed change from `resource_changes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceChange {
    /// Resource type (e.g. `aws_s3_bucket`).
    #[serde(rename = "type", default = "unknown_field")]
    pub resource_type: String,
    /// Resource name.
    #[serde(default = "unknown_field")]
    pub name: String,
    /// The change itself.
    #[serde(default)]
    pub change: ChangeSpec,
}

/// The `change` object of a resource change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeSpec {
    /// Proposed actions, verbatim from the plan.
    #[serde(default)]
    pub actions: Vec<String>,
}

/// The `planned_values` section of a plan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlannedValues {
    /// Root module values.
    #[serde(default)]
    pub root_module: Option<RootModule>,
}

/// The root module under `planned_values`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootModule {
    /// Planned resources in the root module.
    #[serde(default)]
    pub resources: Vec<PlannedResource>,
}

/// One planned resource.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannedResource {
    /// Resource type (e.g. `aws_s3_bucket`).
    #[serde(rename = "type", default = "unknown_field")]
    pub resource_type: String,
    /// Resource name.
    #[serde(default = "unknown_field")]
    pub name: String,
}

fn unknown_field() -> String {
    String::from("unknown")
}

impl PlanDocument {
    /// Checks whether the document carries enough structure to be used.
    ///
    /// A document is invalid when it is empty or lacks both
    /// `format_version` and `terraform_version`. A missing `configuration`
    /// section alone is only a soft warning.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::StructurallyInvalid`] describing what is
    /// missing; the caller is expected to fall back to the file-based
    /// provider scan.
    pub fn validate_structure(&self) -> Result<(), PlanError> {
        if self.is_empty() {
            return Err(PlanError::invalid("document is empty"));
        }

        if self.format_version.is_none() && self.terraform_version.is_none() {
            return Err(PlanError::invalid(
                "missing both format_version and terraform_version",
            ));
        }

        if self.configuration.is_none() {
            warn!("plan has no configuration section; declared providers are unavailable");
        }

        Ok(())
    }

    /// Returns true if no modeled field carries data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.format_version.is_none()
            && self.terraform_version.is_none()
            && self.configuration.is_none()
            && self.resource_changes.is_empty()
            && self.planned_values.is_none()
    }
}
