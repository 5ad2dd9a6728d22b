//! Manifest (package.json) loading and transitivity classification.
//!
//! The lockfile pins every package in the tree; the manifest says which of
//! them the project asked for itself. Only the flat `"dependencies"` object
//! matters here, as a set of `(name, range)` pairs. A missing or unreadable
//! manifest is a valid state, distinct from a manifest with no dependencies:
//! the former makes every record `unknown`, the latter makes them all
//! `transitive`.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::types::Transitivity;

/// The set of `(name, range)` pairs a project declares directly.
pub type ManifestDeps = HashSet<(String, String)>;

/// The slice of a package.json this crate cares about.
#[derive(Debug, Clone, Default, Deserialize)]
struct PackageManifest {
    dependencies: Option<HashMap<String, String>>,
}

/// Loads the direct-dependency set from a package.json.
///
/// Returns `None` when the file cannot be read or is not valid JSON; both
/// are non-fatal and only degrade classification to [`Transitivity::Unknown`].
/// A readable manifest without a `"dependencies"` key yields an empty set.
pub fn load(path: &Path) -> Option<ManifestDeps> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), %err, "manifest unreadable, skipping classification");
            return None;
        }
    };
    let manifest: PackageManifest = match serde_json::from_str(&content) {
        Ok(manifest) => manifest,
        Err(err) => {
            debug!(path = %path.display(), %err, "manifest is not valid JSON, skipping classification");
            return None;
        }
    };
    Some(
        manifest
            .dependencies
            .map(|deps| deps.into_iter().collect())
            .unwrap_or_default(),
    )
}

/// Loads the manifest if a path was supplied at all.
pub fn load_opt(path: Option<&Path>) -> Option<ManifestDeps> {
    path.and_then(load)
}

/// Classifies a block's aliases against the manifest set.
///
/// Any alias matching counts as direct: one resolved package instance may
/// be reachable under several requester-declared ranges, and the manifest
/// only names one of them.
pub fn classify(manifest: Option<&ManifestDeps>, sources: &[(String, String)]) -> Transitivity {
    match manifest {
        None => Transitivity::Unknown,
        Some(deps) => {
            if sources.iter().any(|pair| deps.contains(pair)) {
                Transitivity::Direct
            } else {
                Transitivity::Transitive
            }
        }
    }
}
