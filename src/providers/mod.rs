//! Provider identification and extraction.
//!
//! This module defines the normalized provider reference type shared by the
//! plan-based extractor, the file-based fallback scanner, and the
//! reconciler that merges their results.

mod extract;
mod reconcile;
mod scanner;

pub use extract::extract_from_plan;
pub use reconcile::reconcile;
pub use scanner::scan_directory;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default namespace for providers without an explicit one.
pub const DEFAULT_NAMESPACE: &str = "hashicorp";

/// Length bounds for a provider root inferred from an underscored key.
/// Keys like `aws_s3_bucket` leak resource types into provider positions;
/// a first segment outside these bounds is not treated as a provider root.
const ROOT_LEN: std::ops::RangeInclusive<usize> = 2..=10;

/// A normalized reference to a Terraform provider.
///
/// Identity is `namespace/name`; `name` is always normalized (lowercase,
/// alias suffix stripped, resource-type prefix reduced to the provider
/// root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    /// Registry namespace (e.g. `hashicorp`).
    pub namespace: String,
    /// Normalized provider name (e.g. `aws`).
    pub name: String,
}

impl ProviderRef {
    /// Creates a provider reference, normalizing the name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: &str) -> Self {
        Self {
            namespace: namespace.into(),
            name: normalize_provider_key(name),
        }
    }

    /// Creates a provider reference in the default `hashicorp` namespace.
    #[must_use]
    pub fn hashicorp(name: &str) -> Self {
        Self::new(DEFAULT_NAMESPACE, name)
    }

    /// Builds a provider reference from a `source` attribute.
    ///
    /// A source with exactly two `/`-separated segments yields
    /// `(namespace, provider)`; any other segment count falls back to the
    /// default namespace and the declaring block key.
    #[must_use]
    pub fn from_source(source: &str, block_key: &str) -> Self {
        let segments: Vec<&str> = source.split('/').collect();
        match segments.as_slice() {
            [namespace, name] => Self::new(*namespace, name),
            _ => Self::hashicorp(block_key),
        }
    }

    /// The identity key used for deduplication.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Re-applies name normalization. Idempotent.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(self.namespace.clone(), &self.name)
    }
}

impl fmt::Display for ProviderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Normalizes a provider key to its provider root.
///
/// Lowercases the key, strips an alias/region qualifier
/// (`"aws.us-east-1"` becomes `"aws"`), and reduces an underscored key to
/// its first segment when that segment looks like a provider root
/// (lowercase alphanumeric, 2-10 characters, leading letter). The result
/// is a fixed point: normalizing twice gives the same value.
#[must_use]
pub fn normalize_provider_key(key: &str) -> String {
    let lowered = key.to_ascii_lowercase();
    let base = match lowered.split_once('.') {
        Some((base, _alias)) => base,
        None => lowered.as_str(),
    };

    if let Some((root, _)) = base.split_once('_')
        && ROOT_LEN.contains(&root.len())
        && root.starts_with(|c: char| c.is_ascii_lowercase())
        && root
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return root.to_string();
    }

    base.to_string()
}

/// An ordered set of provider references.
///
/// Preserves insertion order of first discovery while deduplicating by
/// identity key, which is what makes extraction output deterministic.
#[derive(Debug, Default)]
pub struct ProviderSet {
    refs: Vec<ProviderRef>,
    seen: HashSet<String>,
}

impl ProviderSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a provider, returning true if it was not already present.
    pub fn insert(&mut self, provider: ProviderRef) -> bool {
        if self.seen.insert(provider.key()) {
            self.refs.push(provider);
            true
        } else {
            false
        }
    }

    /// Returns true if a provider with this identity key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Number of providers in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Returns true if the set holds no providers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Consumes the set, yielding providers in first-discovery order.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProviderRef> {
        self.refs
    }
}
