use super::{SKIPPED_DIRS, is_relevant_path};
use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Path relative to the scan root, used as the file identifier in every
    /// indexed location.
    pub name: String,
    /// Path to read the file from.
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let name = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        Self { name, path }
    }
}

/// Walks `root` and returns every Go file, sorted by name. Hidden and vendor
/// directories are skipped and ignore files are honored.
pub fn scan_sources(root: &Path) -> Vec<SourceFile> {
    let mut files: Vec<SourceFile> = WalkBuilder::new(root)
        .filter_entry(|entry| !is_skipped_dir(entry))
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| is_relevant_path(entry.path()))
        .map(|entry| SourceFile::new(root, entry.into_path()))
        .collect();

    files.sort();
    debug!(root = %root.display(), files = files.len(), "scanned sources");
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}
