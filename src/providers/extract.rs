//! Plan-based provider extraction.
//!
//! Two sub-extractions run in priority order: declared provider
//! configurations first, then provider roots inferred from resource type
//! prefixes. The second pass only adds providers the first did not
//! produce.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::plan::PlanDocument;

use super::{ProviderRef, ProviderSet};

/// Leading provider root of a resource type, e.g. `aws` in
/// `aws_s3_bucket`.
static RESOURCE_TYPE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z][a-z0-9]*)_").expect("fixed pattern"));

/// Extracts the unique providers a plan depends on.
///
/// Providers declared under `configuration.provider_configs` come first;
/// the entry's `full_provider_name` supplies the namespace when it has the
/// `namespace/name` form, otherwise the namespace defaults to
/// `hashicorp` and the name is the normalized config key. Resource type
/// prefixes from `resource_changes` and `planned_values` then fill in
/// providers the declarations missed.
#[must_use]
pub fn extract_from_plan(plan: &PlanDocument) -> Vec<ProviderRef> {
    let mut set = ProviderSet::new();

    if let Some(configuration) = &plan.configuration {
        for (key, entry) in &configuration.provider_configs {
            let provider = match entry.full_provider_name.as_deref() {
                Some(full) => ProviderRef::from_source(full, key),
                None => ProviderRef::hashicorp(key),
            };
            if set.insert(provider) {
                debug!(key, "provider from declared configuration");
            }
        }
    }

    for change in &plan.resource_changes {
        insert_from_type(&mut set, &change.resource_type);
    }

    if let Some(values) = &plan.planned_values
        && let Some(root) = &values.root_module
    {
        for resource in &root.resources {
            insert_from_type(&mut set, &resource.resource_type);
        }
    }

    set.into_vec()
}

/// Adds the provider root of a resource type, if the type has one.
fn insert_from_type(set: &mut ProviderSet, resource_type: &str) {
    if let Some(captures) = RESOURCE_TYPE_PREFIX.captures(resource_type) {
        let provider = ProviderRef::hashicorp(&captures[1]);
        if set.insert(provider) {
            debug!(resource_type, "provider from resource type prefix");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(value: serde_json::Value) -> PlanDocument {
        serde_json::from_value(value).unwrap()
    }

    fn keys(providers: &[ProviderRef]) -> Vec<String> {
        providers.iter().map(ProviderRef::key).collect()
    }

    #[test]
    fn test_extract_from_declared_configs() {
        let plan = plan(json!({
            "format_version": "1.2",
            "configuration": {
                "provider_configs": {
                    "aws": {"name": "aws"},
                    "google": {"name": "google"}
                }
            }
        }));

        let providers = extract_from_plan(&plan);
        assert_eq!(keys(&providers), vec!["hashicorp/aws", "hashicorp/google"]);
    }

    #[test]
    fn test_alias_keys_collapse_to_one_provider() {
        let plan = plan(json!({
            "format_version": "1.2",
            "configuration": {
                "provider_configs": {
                    "aws": {"name": "aws"},
                    "aws.us-east-1": {"name": "aws", "alias": "us-east-1"}
                }
            }
        }));

        let providers = extract_from_plan(&plan);
        assert_eq!(keys(&providers), vec!["hashicorp/aws"]);
    }

    #[test]
    fn test_full_provider_name_sets_namespace() {
        let plan = plan(json!({
            "format_version": "1.2",
            "configuration": {
                "provider_configs": {
                    "datadog": {"full_provider_name": "DataDog/datadog"}
                }
            }
        }));

        let providers = extract_from_plan(&plan);
        assert_eq!(keys(&providers), vec!["DataDog/datadog"]);
    }

    #[test]
    fn test_resource_type_looking_key_is_reduced() {
        let plan = plan(json!({
            "format_version": "1.2",
            "configuration": {
                "provider_configs": {
                    "aws_s3_bucket": {}
                }
            }
        }));

        let providers = extract_from_plan(&plan);
        assert_eq!(keys(&providers), vec!["hashicorp/aws"]);
    }

    #[test]
    fn test_extract_from_resource_type_prefixes() {
        let plan = plan(json!({
            "format_version": "1.2",
            "resource_changes": [
                {"type": "aws_s3_bucket", "name": "b", "change": {"actions": ["create"]}},
                {"type": "azurerm_vm", "name": "v", "change": {"actions": ["create"]}}
            ]
        }));

        let providers = extract_from_plan(&plan);
        assert_eq!(keys(&providers), vec!["hashicorp/aws", "hashicorp/azurerm"]);
    }

    #[test]
    fn test_prefixes_only_supplement_declarations() {
        let plan = plan(json!({
            "format_version": "1.2",
            "configuration": {
                "provider_configs": {
                    "aws": {"name": "aws"}
                }
            },
            "resource_changes": [
                {"type": "aws_s3_bucket", "name": "b", "change": {"actions": ["create"]}},
                {"type": "google_compute_instance", "name": "g", "change": {"actions": ["create"]}}
            ]
        }));

        let providers = extract_from_plan(&plan);
        // `aws` is already present from the declaration and is not
        // duplicated; `google` is added from the prefix pass.
        assert_eq!(keys(&providers), vec!["hashicorp/aws", "hashicorp/google"]);
    }

    #[test]
    fn test_planned_values_contribute_prefixes() {
        let plan = plan(json!({
            "format_version": "1.2",
            "planned_values": {
                "root_module": {
                    "resources": [
                        {"type": "cloudflare_record", "name": "r"}
                    ]
                }
            }
        }));

        let providers = extract_from_plan(&plan);
        assert_eq!(keys(&providers), vec!["hashicorp/cloudflare"]);
    }

    #[test]
    fn test_types_without_prefix_are_ignored() {
        let plan = plan(json!({
            "format_version": "1.2",
            "resource_changes": [
                {"type": "unknown", "name": "u", "change": {"actions": ["create"]}},
                {"type": "Data_thing", "name": "d", "change": {"actions": ["create"]}}
            ]
        }));

        let providers = extract_from_plan(&plan);
        assert!(providers.is_empty());
    }
}
