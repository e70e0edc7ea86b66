use goscope_core::error::Result;
use goscope_core::project::SourceFile;
use goscope_core::{Workspace, WorkspaceBuilder};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder with every available language front end registered.
pub fn default_builder(root: PathBuf) -> WorkspaceBuilder {
    WorkspaceBuilder::new(root).with_indexer(Arc::new(goscope_go::GoIndexer::new()))
}

/// Scans `root` and builds a frozen workspace over every Go file found.
pub fn build_workspace(root: PathBuf) -> Result<Workspace> {
    tracing::info!("building workspace for {}", root.display());
    default_builder(root).build()
}

/// Builds a workspace over exactly `files`, in the given order. Relative
/// names are resolved against `root`.
pub fn build_workspace_from_files(root: PathBuf, files: &[PathBuf]) -> Workspace {
    let sources = files
        .iter()
        .map(|file| {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                root.join(file)
            };
            SourceFile::new(&root, path)
        })
        .collect();
    default_builder(root).build_from_files(sources)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(goscope_core::logging::init_logging(component, to_stderr))
}
