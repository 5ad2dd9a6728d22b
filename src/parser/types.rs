//! Shared types for lockfile parsing.
//!
//! This module defines the core data structures used to represent
//! dependency blocks as they appear in a lockfile and the normalized
//! records extracted from them.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The package ecosystem a record belongs to.
///
/// Yarn lockfiles always pin npm packages, so every record carries the
/// same tag; it exists so downstream consumers can mix records from
/// other lockfile kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// The npm registry ecosystem.
    Npm,
}

impl Ecosystem {
    /// Returns a short label for the ecosystem.
    pub fn label(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How a resolved package relates to the project's own manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transitivity {
    /// Declared directly in the project manifest.
    Direct,
    /// Pulled in by some other dependency.
    Transitive,
    /// No manifest was available, so the relation is undeterminable.
    Unknown,
}

impl Transitivity {
    /// Returns a short label for the transitivity.
    pub fn label(&self) -> &'static str {
        match self {
            Transitivity::Direct => "direct",
            Transitivity::Transitive => "transitive",
            Transitivity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Transitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One dependency block as it appears in the lockfile, before assembly.
///
/// `sources` holds the `(name, range)` alias pairs from the header line in
/// file order; several aliases may resolve to the same installed package
/// instance. `fields` holds the two-space-indented metadata lines, with the
/// last occurrence winning on duplicate keys.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    /// 1-based line of the block's header in the lockfile.
    pub line_number: usize,
    /// Alias pairs from the header, in file order.
    pub sources: Vec<(String, String)>,
    /// Metadata key/value lines.
    pub fields: HashMap<String, String>,
}

impl RawBlock {
    /// Returns the pinned version, if the block carries one.
    ///
    /// Workspace-local and alias-only entries have no `version` field and
    /// never become records.
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").map(String::as_str)
    }
}

/// A fully resolved dependency extracted from the lockfile.
///
/// This is the normalized output form: either every field is populated
/// according to the block it came from, or the block was dropped entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyRecord {
    /// The package name, taken from the block's first alias.
    pub package: String,
    /// The exact resolved version.
    pub version: String,
    /// The ecosystem the package was resolved in.
    pub ecosystem: Ecosystem,
    /// Content hashes keyed by lower-cased algorithm name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub allowed_hashes: BTreeMap<String, Vec<String>>,
    /// URL the package archive was resolved from, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
    /// Relation to the project manifest.
    pub transitivity: Transitivity,
    /// 1-based line of the block this record came from.
    pub line_number: usize,
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} ({})",
            self.package, self.version, self.transitivity
        )
    }
}
