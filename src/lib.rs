//! Lockscope - yarn lockfile dependency extractor
//!
//! This crate parses both yarn lockfile dialects into a flat, ordered list
//! of dependency records (name, pinned version, resolved URL, integrity
//! hashes) and classifies each record as direct or transitive against the
//! project's package.json.

pub mod export;
pub mod parser;
