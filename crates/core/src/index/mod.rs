//! The word index: every indexed occurrence, bucketed by identifier name,
//! plus the function and type declaration tables derived from it.
//!
//! An [`Index`] is assembled by an [`IndexBuilder`] from per-file results and
//! is read-only once [`IndexBuilder::finish`] returns; the only mutation after
//! the files are merged is scope resolution, which runs inside `finish`.

mod summary;

pub use summary::{Summary, WordCount};

use crate::error::Result;
use crate::model::{Function, Reference, Struct};
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// Position of a reference in the index arena.
pub type RefId = usize;

/// Language front end: turns one file's source text into references.
pub trait SourceIndexer: Send + Sync {
    fn language(&self) -> &str;

    fn supports_path(&self, path: &Path) -> bool;

    /// Indexes a single file. `file` is the identifier recorded in every
    /// location; a syntactically invalid file is reported as
    /// [`crate::GoscopeError::Parsing`].
    fn index_file(&self, file: &str, source: &str) -> Result<FileIndex>;
}

/// References found in one file, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    pub file: String,
    pub references: Vec<Reference>,
}

impl FileIndex {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            references: Vec::new(),
        }
    }

    pub fn push(&mut self, reference: impl Into<Reference>) {
        self.references.push(reference.into());
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Index {
    files: Vec<String>,
    refs: Vec<Reference>,
    words: IndexMap<String, Vec<RefId>>,
    functions: IndexMap<String, Vec<RefId>>,
    structs: IndexMap<String, Vec<RefId>>,
}

impl Index {
    /// Files that contributed to the index, in merge order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Total number of indexed occurrences.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Distinct identifier names, in first-seen order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Every reference in discovery order.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.refs.iter()
    }

    /// All occurrences of exactly `word`, or `None` when the word was never
    /// indexed.
    pub fn references_by_word(&self, word: &str) -> Option<Vec<&Reference>> {
        self.words
            .get(word)
            .map(|ids| ids.iter().map(|&id| &self.refs[id]).collect())
    }

    /// Number of occurrences of `word` (0 when unknown).
    pub fn occurrences(&self, word: &str) -> usize {
        self.words.get(word).map_or(0, Vec::len)
    }

    /// Function declarations grouped by name. A name maps to several entries
    /// when it is declared in several files or on several receivers.
    pub fn functions(&self) -> impl Iterator<Item = (&str, Vec<&Function>)> {
        self.functions
            .iter()
            .map(|(name, ids)| (name.as_str(), self.functions_at(ids)))
    }

    pub fn function_declarations(&self, name: &str) -> Option<Vec<&Function>> {
        self.functions.get(name).map(|ids| self.functions_at(ids))
    }

    /// Number of distinct declared function names.
    pub fn function_name_count(&self) -> usize {
        self.functions.len()
    }

    pub fn struct_declarations(&self, name: &str) -> Option<Vec<&Struct>> {
        self.structs.get(name).map(|ids| {
            ids.iter()
                .filter_map(|&id| match &self.refs[id] {
                    Reference::Struct(s) => Some(s),
                    _ => None,
                })
                .collect()
        })
    }

    pub fn struct_name_count(&self) -> usize {
        self.structs.len()
    }

    fn functions_at(&self, ids: &[RefId]) -> Vec<&Function> {
        ids.iter()
            .filter_map(|&id| self.refs[id].as_function())
            .collect()
    }

    fn insert(&mut self, reference: Reference) {
        let id = self.refs.len();
        let name = reference.name().to_string();

        match &reference {
            Reference::Function(f) if f.is_decl => {
                self.functions.entry(name.clone()).or_default().push(id);
            }
            Reference::Struct(_) => {
                self.structs.entry(name.clone()).or_default().push(id);
            }
            _ => {}
        }

        self.words.entry(name).or_default().push(id);
        self.refs.push(reference);
    }

    /// Arena ids of every function declaration, grouped by name in
    /// first-seen order.
    pub(crate) fn declaration_ids(&self) -> Vec<RefId> {
        self.functions.values().flatten().copied().collect()
    }

    pub(crate) fn reference(&self, id: RefId) -> &Reference {
        &self.refs[id]
    }

    pub(crate) fn reference_mut(&mut self, id: RefId) -> &mut Reference {
        &mut self.refs[id]
    }
}

/// Collects per-file results and freezes them into an [`Index`].
#[derive(Debug, Default)]
pub struct IndexBuilder {
    index: Index,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one file's references. Files are merged in call order, which
    /// becomes the discovery order of every bucket.
    pub fn add_file(&mut self, file_index: FileIndex) {
        debug!(
            file = %file_index.file,
            references = file_index.references.len(),
            "merging file index"
        );
        self.index.files.push(file_index.file);
        for reference in file_index.references {
            self.index.insert(reference);
        }
    }

    /// Resolves scopes and call lists against the complete file set and
    /// returns the finished index.
    pub fn finish(mut self) -> Index {
        crate::scope::resolve(&mut self.index);
        self.index
    }
}
