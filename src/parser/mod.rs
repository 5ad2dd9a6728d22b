//! Parser module for Lockscope.
//!
//! This module turns lockfile text into normalized dependency records.
//!
//! # Supported Formats
//!
//! - **yarn.lock v1** (yarn classic) - Fully supported
//! - **yarn.lock v2+** (yarn berry) - Fully supported
//! - **package-lock.json** (npm) - Planned
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use lockscope::parser::{yarn, Transitivity};
//!
//! // Parse a lockfile, classifying against the project manifest
//! let records = yarn::parse_file(
//!     Path::new("yarn.lock"),
//!     Some(Path::new("package.json")),
//! ).unwrap();
//!
//! let direct: Vec<_> = records.iter()
//!     .filter(|r| r.transitivity == Transitivity::Direct)
//!     .collect();
//!
//! println!("{} pinned, {} direct", records.len(), direct.len());
//! ```

pub mod integrity;
pub mod manifest;
pub mod scan;
pub mod types;
pub mod yarn;

// Re-export commonly used types for convenience
pub use manifest::ManifestDeps;
pub use types::{DependencyRecord, Ecosystem, RawBlock, Transitivity};
pub use yarn::{
    detect_format, parse_file, parse_str, LockfileFormat, ParseError, ParseResult,
};
