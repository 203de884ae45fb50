//! File-based provider scanning.
//!
//! Fallback used when no plan is available or usable: configuration files
//! in a single directory are searched for `required_providers` blocks with
//! fixed patterns. The scan is heuristic and best-effort; it does not
//! attempt to be a configuration-language parser.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::{ProviderRef, ProviderSet, normalize_provider_key};

/// Extension of scanned configuration files.
const CONFIG_EXTENSION: &str = "tf";

/// Opening of a `required_providers` block.
static REQUIRED_PROVIDERS_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"required_providers\s*\{").expect("fixed pattern"));

/// One `name = { ... }` entry inside a `required_providers` block.
/// The body match stops at the first closing brace, so nested braces
/// inside an entry are out of contract.
static PROVIDER_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*\{([^}]*)\}").expect("fixed pattern")
});

/// The `source = "..."` attribute of an entry.
static SOURCE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"source\s*=\s*"([^"]+)""#).expect("fixed pattern"));

/// Scans a directory (non-recursively) for declared provider requirements.
///
/// A missing or unreadable directory yields an empty list. Files are
/// visited in lexicographic name order so the output is deterministic;
/// the first declaration of a provider key wins and later duplicates
/// across files are ignored. A file that cannot be read is logged and
/// skipped without aborting the scan.
#[must_use]
pub fn scan_directory(dir: impl AsRef<Path>) -> Vec<ProviderRef> {
    let dir = dir.as_ref();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Fallback directory not readable: {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(CONFIG_EXTENSION)
        })
        .collect();
    files.sort();

    let mut scan = DirectoryScan::default();
    for file in files {
        match std::fs::read_to_string(&file) {
            Ok(content) => {
                debug!("Scanning configuration file: {}", file.display());
                scan.scan_contents(&content);
            }
            Err(e) => {
                warn!("Skipping configuration file {}: {e}", file.display());
            }
        }
    }

    scan.into_vec()
}

/// Accumulated scan state across the files of one directory.
#[derive(Debug, Default)]
struct DirectoryScan {
    providers: ProviderSet,
    /// Normalized block keys already declared; first declaration wins.
    seen_keys: std::collections::HashSet<String>,
}

impl DirectoryScan {
    /// Collects provider declarations from one file's contents.
    fn scan_contents(&mut self, content: &str) {
        for open in REQUIRED_PROVIDERS_OPEN.find_iter(content) {
            let Some(body) = block_body(content, open.end()) else {
                warn!("Unterminated required_providers block; skipping");
                continue;
            };

            for entry in PROVIDER_ENTRY.captures_iter(body) {
                let key = &entry[1];
                let normalized_key = normalize_provider_key(key);
                if !self.seen_keys.insert(normalized_key) {
                    continue;
                }

                let provider = match SOURCE_ATTR.captures(&entry[2]) {
                    Some(source) => ProviderRef::from_source(&source[1], key),
                    None => ProviderRef::hashicorp(key),
                };
                self.providers.insert(provider);
            }
        }
    }

    fn into_vec(self) -> Vec<ProviderRef> {
        self.providers.into_vec()
    }
}

/// Returns the text between the brace ending at `start` and its matching
/// close, or `None` when the block never closes.
fn block_body(content: &str, start: usize) -> Option<&str> {
    let mut depth = 1usize;
    for (offset, c) in content[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[start..start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
