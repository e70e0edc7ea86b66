//! Prefix search over the frozen index.

pub mod engine;
pub mod model;
pub mod options;
pub mod ranking;

pub use engine::QueryEngine;
pub use model::{ResultRecord, WordMatch, format_results};
pub use options::{FileFilter, KindFilter, ListOrder, QueryOptions, RankBy};
