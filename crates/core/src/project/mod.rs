pub mod scanner;

pub use scanner::{SourceFile, scan_sources};

use std::path::Path;

/// Extension of the files the indexer reads.
pub const GO_EXTENSION: &str = "go";

/// Directory names never descended into.
pub const SKIPPED_DIRS: &[&str] = &["vendor"];

/// Checks if a path is a Go source file.
pub fn is_relevant_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext == GO_EXTENSION)
}
