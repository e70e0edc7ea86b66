//! Assembly of a frozen, queryable workspace from a directory of sources.
//!
//! Building runs in fixed phases: scan, parallel per-file indexing, ordered
//! merge, scope resolution, trie construction and call graph construction.
//! Files that cannot be read or parsed are logged and left out; the rest of
//! the project is still indexed.

use crate::callgraph::{CallStackRoot, build_call_graph};
use crate::error::{GoscopeError, Result};
use crate::index::{FileIndex, Index, IndexBuilder, SourceIndexer, Summary};
use crate::preview::FileManager;
use crate::project::{SourceFile, scan_sources};
use crate::query::QueryEngine;
use crate::trie::Trie;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Read-only view over one indexed project. Cloning is cheap.
#[derive(Clone)]
pub struct Workspace {
    root: PathBuf,
    index: Arc<Index>,
    trie: Arc<Trie>,
    call_graph: Option<Arc<CallStackRoot>>,
}

impl Workspace {
    /// Wraps an already finished index, deriving the trie and call graph.
    pub fn from_index(root: impl Into<PathBuf>, index: Index) -> Self {
        let start = Instant::now();
        let trie = Trie::from_index(&index);
        let call_graph = build_call_graph(&index).map(Arc::new);
        if call_graph.is_none() {
            info!("no entry function found, call graph unavailable");
        }
        debug!("derived trie and call graph in {:?}", start.elapsed());

        Self {
            root: root.into(),
            index: Arc::new(index),
            trie: Arc::new(trie),
            call_graph,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn call_graph(&self) -> Option<&CallStackRoot> {
        self.call_graph.as_deref()
    }

    pub fn query_engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.index, &self.trie)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_index(&self.index, self.call_graph())
    }

    pub fn file_manager(&self) -> FileManager {
        FileManager::new(self.root.clone())
    }
}

pub struct WorkspaceBuilder {
    root: PathBuf,
    indexers: Vec<Arc<dyn SourceIndexer>>,
}

impl WorkspaceBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            indexers: Vec::new(),
        }
    }

    pub fn with_indexer(mut self, indexer: Arc<dyn SourceIndexer>) -> Self {
        self.indexers.push(indexer);
        self
    }

    /// Scans the root and indexes every discovered file.
    pub fn build(self) -> Result<Workspace> {
        if !self.root.is_dir() {
            return Err(GoscopeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", self.root.display()),
            )));
        }

        let start = Instant::now();
        let files = scan_sources(&self.root);
        info!(
            "found {} source files under {} in {:?}",
            files.len(),
            self.root.display(),
            start.elapsed()
        );
        Ok(self.build_from_files(files))
    }

    /// Indexes exactly `files`, merged in the given order.
    pub fn build_from_files(self, files: Vec<SourceFile>) -> Workspace {
        let start = Instant::now();
        let parsed: Vec<Option<FileIndex>> =
            files.par_iter().map(|file| self.index_one(file)).collect();

        let total = parsed.len();
        let mut builder = IndexBuilder::new();
        let mut indexed = 0;
        for file_index in parsed.into_iter().flatten() {
            builder.add_file(file_index);
            indexed += 1;
        }
        info!(
            "indexed {}/{} files in {:?}",
            indexed,
            total,
            start.elapsed()
        );

        let index = builder.finish();
        info!(
            "index ready: {} references, {} unique words, {} functions",
            index.len(),
            index.word_count(),
            index.function_name_count()
        );
        Workspace::from_index(self.root, index)
    }

    fn index_one(&self, file: &SourceFile) -> Option<FileIndex> {
        let Some(indexer) = self
            .indexers
            .iter()
            .find(|indexer| indexer.supports_path(&file.path))
        else {
            debug!("no indexer for {}", file.name);
            return None;
        };

        let source = match std::fs::read_to_string(&file.path) {
            Ok(source) => source,
            Err(e) => {
                warn!("failed to read {}: {}", file.name, e);
                return None;
            }
        };

        match indexer.index_file(&file.name, &source) {
            Ok(file_index) => Some(file_index),
            Err(e) => {
                warn!("skipping {} ({}): {}", file.name, indexer.language(), e);
                None
            }
        }
    }
}
