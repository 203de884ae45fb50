//! Resource change summarization.
//!
//! Aggregates a plan's `resource_changes` into action counts and ordered
//! per-resource rows for the report and the `summary` command.

use serde::Serialize;

use super::document::PlanDocument;

/// Counts per recognized action kind.
///
/// Only `create`, `update`, `delete`, and `replace` are counted; other
/// action kinds are retained verbatim in the per-resource rows but do not
/// contribute to any counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionCounts {
    /// Number of `create` actions.
    pub create: usize,
    /// Number of `update` actions.
    pub update: usize,
    /// Number of `delete` actions.
    pub delete: usize,
    /// Number of `replace` actions.
    pub replace: usize,
}

/// One summarized resource change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRow {
    /// Resource type (e.g. `aws_s3_bucket`).
    pub resource_type: String,
    /// Resource name.
    pub name: String,
    /// Actions verbatim from the plan, including unrecognized kinds.
    pub actions: Vec<String>,
}

/// Summary of the resource changes in a plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeSummary {
    /// Counts per recognized action kind.
    pub counts: ActionCounts,
    /// Distinct resource types in first-appearance order.
    pub resource_types: Vec<String>,
    /// Per-resource rows in plan order.
    pub resources: Vec<ResourceRow>,
}

impl ChangeSummary {
    /// Builds a summary from a plan document.
    #[must_use]
    pub fn from_plan(plan: &PlanDocument) -> Self {
        let mut counts = ActionCounts::default();
        let mut resource_types: Vec<String> = Vec::new();
        let mut resources = Vec::new();

        for change in &plan.resource_changes {
            for action in &change.change.actions {
                match action.as_str() {
                    "create" => counts.create += 1,
                    "update" => counts.update += 1,
                    "delete" => counts.delete += 1,
                    "replace" => counts.replace += 1,
                    _ => {}
                }
            }

            if !resource_types.contains(&change.resource_type) {
                resource_types.push(change.resource_type.clone());
            }

            resources.push(ResourceRow {
                resource_type: change.resource_type.clone(),
                name: change.name.clone(),
                actions: change.change.actions.clone(),
            });
        }

        Self {
            counts,
            resource_types,
            resources,
        }
    }

    /// Total number of resource changes.
    #[must_use]
    pub fn total_resources(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if the plan proposed no resource changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(value: serde_json::Value) -> PlanDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_create_scenario() {
        let plan = plan(json!({
            "format_version": "1.2",
            "resource_changes": [
                {"type": "aws_s3_bucket", "name": "b", "change": {"actions": ["create"]}}
            ]
        }));

        let summary = ChangeSummary::from_plan(&plan);
        assert_eq!(summary.total_resources(), 1);
        assert_eq!(
            summary.counts,
            ActionCounts {
                create: 1,
                update: 0,
                delete: 0,
                replace: 0
            }
        );
        assert_eq!(summary.resource_types, vec!["aws_s3_bucket"]);
    }

    #[test]
    fn test_counts_across_resources() {
        let plan = plan(json!({
            "format_version": "1.2",
            "resource_changes": [
                {"type": "aws_s3_bucket", "name": "a", "change": {"actions": ["create"]}},
                {"type": "aws_s3_bucket", "name": "b", "change": {"actions": ["delete", "create"]}},
                {"type": "aws_instance", "name": "c", "change": {"actions": ["update"]}}
            ]
        }));

        let summary = ChangeSummary::from_plan(&plan);
        assert_eq!(summary.counts.create, 2);
        assert_eq!(summary.counts.delete, 1);
        assert_eq!(summary.counts.update, 1);
        assert_eq!(summary.counts.replace, 0);
        // Distinct types, first-appearance order.
        assert_eq!(summary.resource_types, vec!["aws_s3_bucket", "aws_instance"]);
    }

    #[test]
    fn test_unknown_actions_retained_but_not_counted() {
        let plan = plan(json!({
            "format_version": "1.2",
            "resource_changes": [
                {"type": "aws_s3_bucket", "name": "b", "change": {"actions": ["no-op"]}}
            ]
        }));

        let summary = ChangeSummary::from_plan(&plan);
        assert_eq!(summary.counts, ActionCounts::default());
        assert_eq!(summary.resources[0].actions, vec!["no-op"]);
    }

    #[test]
    fn test_empty_plan_yields_empty_summary() {
        let plan = plan(json!({"format_version": "1.2"}));
        let summary = ChangeSummary::from_plan(&plan);
        assert!(summary.is_empty());
        assert_eq!(summary.total_resources(), 0);
    }
}
