mod scope;
mod visitor;

use goscope_core::error::{GoscopeError, Result};
use goscope_core::FileIndex;
use tree_sitter::{Language, Parser, Tree};
use tracing::debug;

#[derive(Clone)]
pub struct GoParser {
    pub language: Language,
}

impl GoParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Parses `source`, failing when tree-sitter had to recover from a
    /// syntax error anywhere in the file.
    pub fn parse(&self, file: &str, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| GoscopeError::Parsing(format!("{}: {}", file, e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| GoscopeError::Parsing(format!("{}: parser produced no tree", file)))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(1);
            return Err(GoscopeError::Parsing(format!(
                "{}:{}: syntax error",
                file, line
            )));
        }
        Ok(tree)
    }

    pub fn index(&self, file: &str, source: &str) -> Result<FileIndex> {
        let tree = self.parse(file, source)?;
        let file_index = visitor::GoVisitor::new(file, source.as_bytes()).run(tree.root_node());
        debug!("{}: {} references", file, file_index.len());
        Ok(file_index)
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

fn first_error_line(node: tree_sitter::Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}
