//! Provider reconciliation.
//!
//! Merges the plan-based extractor and the file-based scanner into one
//! deterministic provider list: the plan wins when it is usable and
//! yields providers, the directory scan covers every other case.

use std::path::Path;

use tracing::{debug, info};

use crate::plan::read_plan;

use super::{ProviderRef, ProviderSet, extract_from_plan, scan_directory};

/// Produces the reconciled provider list for a plan path and a fallback
/// directory.
///
/// An unusable plan (missing, malformed, or structurally invalid) or a
/// plan yielding no providers falls back to scanning `fallback_dir`. The
/// returned order is first-discovery order; identical inputs always
/// produce the identical sequence.
#[must_use]
pub fn reconcile(plan_path: impl AsRef<Path>, fallback_dir: impl AsRef<Path>) -> Vec<ProviderRef> {
    let plan_path = plan_path.as_ref();
    let fallback_dir = fallback_dir.as_ref();

    let plan = match read_plan(plan_path) {
        Ok(plan) => plan,
        Err(e) => {
            info!("Plan unusable ({e}); scanning {} instead", fallback_dir.display());
            return scan_directory(fallback_dir);
        }
    };

    let extracted = extract_from_plan(&plan);
    if extracted.is_empty() {
        info!(
            "Plan declares no providers; scanning {} instead",
            fallback_dir.display()
        );
        return scan_directory(fallback_dir);
    }

    // Final pass: re-apply name normalization and re-deduplicate by
    // identity key. Normalization is idempotent, so this can only shrink
    // the list, never reorder surviving entries.
    let mut set = ProviderSet::new();
    for provider in extracted {
        set.insert(provider.normalized());
    }

    debug!(count = set.len(), "providers reconciled from plan");
    set.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn keys(providers: &[ProviderRef]) -> Vec<String> {
        providers.iter().map(ProviderRef::key).collect()
    }

    const FALLBACK_TF: &str = r#"
terraform {
  required_providers {
    aws = { source = "hashicorp/aws" }
  }
}
"#;

    #[test]
    fn test_missing_plan_falls_back_to_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "versions.tf", FALLBACK_TF);

        let providers = reconcile(dir.path().join("absent.json"), dir.path());
        assert_eq!(keys(&providers), vec!["hashicorp/aws"]);
    }

    #[test]
    fn test_empty_object_plan_falls_back_to_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "tfplan.json", "{}");
        write_file(&dir, "versions.tf", FALLBACK_TF);

        let providers = reconcile(dir.path().join("tfplan.json"), dir.path());
        assert_eq!(keys(&providers), vec!["hashicorp/aws"]);
    }

    #[test]
    fn test_malformed_plan_falls_back_to_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "tfplan.json", "{broken");
        write_file(&dir, "versions.tf", FALLBACK_TF);

        let providers = reconcile(dir.path().join("tfplan.json"), dir.path());
        assert_eq!(keys(&providers), vec!["hashicorp/aws"]);
    }

    #[test]
    fn test_usable_plan_wins_over_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir,
            "tfplan.json",
            r#"{
  "format_version": "1.2",
  "resource_changes": [
    {"type": "google_compute_instance", "name": "g", "change": {"actions": ["create"]}}
  ]
}"#,
        );
        write_file(&dir, "versions.tf", FALLBACK_TF);

        let providers = reconcile(dir.path().join("tfplan.json"), dir.path());
        assert_eq!(keys(&providers), vec!["hashicorp/google"]);
    }

    #[test]
    fn test_plan_without_providers_falls_back_to_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir,
            "tfplan.json",
            r#"{"format_version": "1.2", "terraform_version": "1.9.0"}"#,
        );
        write_file(&dir, "versions.tf", FALLBACK_TF);

        let providers = reconcile(dir.path().join("tfplan.json"), dir.path());
        assert_eq!(keys(&providers), vec!["hashicorp/aws"]);
    }

    #[test]
    fn test_everything_empty_is_still_empty() {
        let dir = tempfile::tempdir().unwrap();
        let providers = reconcile(dir.path().join("absent.json"), dir.path());
        assert!(providers.is_empty());
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir,
            "tfplan.json",
            r#"{
  "format_version": "1.2",
  "configuration": {
    "provider_configs": {
      "google": {"name": "google"},
      "aws": {"name": "aws"},
      "aws.us-east-1": {"name": "aws", "alias": "us-east-1"}
    }
  },
  "resource_changes": [
    {"type": "azurerm_vm", "name": "v", "change": {"actions": ["create"]}}
  ]
}"#,
        );

        let first = reconcile(dir.path().join("tfplan.json"), dir.path());
        let second = reconcile(dir.path().join("tfplan.json"), dir.path());
        assert_eq!(first, second);
        assert_eq!(
            keys(&first),
            vec!["hashicorp/aws", "hashicorp/google", "hashicorp/azurerm"]
        );
    }
}
