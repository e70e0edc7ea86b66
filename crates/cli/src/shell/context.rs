use goscope_core::Workspace;
use goscope_core::query::QueryEngine;

/// State shared by the command loop, the completer and the prompt.
#[derive(Clone)]
pub struct ShellContext {
    workspace: Workspace,
}

impl ShellContext {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn engine(&self) -> QueryEngine<'_> {
        self.workspace.query_engine()
    }

    /// Last component of the project root, for the prompt.
    pub fn project_name(&self) -> String {
        self.workspace
            .root()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.workspace.root().display().to_string())
    }
}
