//! Source snippets around a line, for showing search hits in context.

use crate::error::{GoscopeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Lines shown above and below the requested line.
pub const PREVIEW_LINE_OFFSET: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub code: String,
}

/// Reads project files relative to a fixed root.
#[derive(Debug, Clone)]
pub struct FileManager {
    root: PathBuf,
    offset: usize,
}

impl FileManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            offset: PREVIEW_LINE_OFFSET,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `file` under the root. Absolute paths and paths that climb
    /// out of the root are refused.
    pub fn resolve(&self, file: &str) -> Result<PathBuf> {
        let relative = Path::new(file);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || file.is_empty() {
            return Err(GoscopeError::Query(format!(
                "path '{}' is outside the project",
                file
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Lines `line - offset ..= line + offset` of `file` (1-based, clamped
    /// to the file), each rendered as `"<n>\t<text>"`.
    pub fn preview(&self, file: &str, line: usize) -> Result<Preview> {
        let content = fs::read_to_string(self.resolve(file)?)?;
        let first = line.saturating_sub(self.offset).max(1);
        let last = line.saturating_add(self.offset);

        let code = content
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text))
            .skip_while(|(n, _)| *n < first)
            .take_while(|(n, _)| *n <= last)
            .map(|(n, text)| format!("{}\t{}", n, text))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Preview { code })
    }
}
