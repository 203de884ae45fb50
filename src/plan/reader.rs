//! Plan file loading.

use std::path::Path;

use tracing::{debug, info};

use crate::error::PlanError;

use super::document::PlanDocument;

/// Loads and validates a plan document from a JSON file.
///
/// # Errors
///
/// Returns [`PlanError::NotFound`] if the file does not exist,
/// [`PlanError::MalformedJson`] if it cannot be read or parsed, and
/// [`PlanError::StructurallyInvalid`] if the parsed document fails
/// [`PlanDocument::validate_structure`]. All three direct the caller to
/// the file-based provider scan; only `NotFound` on the primary input is
/// fatal at the process boundary.
pub fn read_plan(path: impl AsRef<Path>) -> Result<PlanDocument, PlanError> {
    let path = path.as_ref();
    info!("Loading plan from: {}", path.display());

    if !path.exists() {
        return Err(PlanError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| PlanError::MalformedJson {
        message: format!("Failed to read file: {e}"),
        location: Some(path.display().to_string()),
    })?;

    let doc: PlanDocument = serde_json::from_str(&content).map_err(|e| PlanError::MalformedJson {
        message: e.to_string(),
        location: Some(path.display().to_string()),
    })?;

    doc.validate_structure()?;

    debug!(
        resource_changes = doc.resource_changes.len(),
        "plan loaded"
    );
    Ok(doc)
}
