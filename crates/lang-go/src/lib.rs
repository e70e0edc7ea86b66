//! Go front end: parses Go sources with tree-sitter and emits the
//! references of one file.

pub mod parser;

use goscope_core::error::Result;
use goscope_core::project::is_relevant_path;
use goscope_core::{FileIndex, SourceIndexer};
use std::path::Path;

pub use parser::GoParser;

pub struct GoIndexer {
    parser: GoParser,
}

impl GoIndexer {
    pub fn new() -> Self {
        Self {
            parser: GoParser::new(),
        }
    }
}

impl Default for GoIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceIndexer for GoIndexer {
    fn language(&self) -> &str {
        "go"
    }

    fn supports_path(&self, path: &Path) -> bool {
        is_relevant_path(path)
    }

    fn index_file(&self, file: &str, source: &str) -> Result<FileIndex> {
        self.parser.index(file, source)
    }
}
