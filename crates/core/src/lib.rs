pub mod error;
pub mod logging;

pub mod callgraph;
pub mod index;
pub mod model;
pub mod preview;
pub mod project;
pub mod query;
pub mod trie;
pub mod workspace;

mod scope;

pub use error::{GoscopeError, Result};
pub use index::{FileIndex, Index, IndexBuilder, SourceIndexer};
pub use workspace::{Workspace, WorkspaceBuilder};
