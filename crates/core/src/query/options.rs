use crate::model::{Reference, ReferenceKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Default number of results returned by a query.
pub const DEFAULT_RESULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    #[default]
    Lexicographic,
    Count,
    Relevance,
}

impl FromStr for RankBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lex" | "lexicographic" => Ok(RankBy::Lexicographic),
            "count" => Ok(RankBy::Count),
            "rel" | "relevance" => Ok(RankBy::Relevance),
            other => Err(format!("unknown sort option '{}'", other)),
        }
    }
}

/// Ordering for exact-word listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    /// By file, then line.
    #[default]
    Position,
    Relevance,
}

impl FromStr for ListOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pos" | "position" => Ok(ListOrder::Position),
            "rel" | "relevance" => Ok(ListOrder::Relevance),
            other => Err(format!("unknown sort option '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(ReferenceKind),
}

impl KindFilter {
    pub fn accepts(&self, reference: &Reference) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(kind) => reference.kind() == *kind,
        }
    }
}

impl FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") || s.is_empty() {
            return Ok(KindFilter::All);
        }
        s.parse::<ReferenceKind>().map(KindFilter::Only)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileFilter {
    #[default]
    All,
    /// Keep references whose file equals one of these paths or ends with it
    /// (whole path components only).
    Files(Vec<String>),
}

impl FileFilter {
    pub fn accepts(&self, reference: &Reference) -> bool {
        self.accepts_file(&reference.location().file)
    }

    pub fn accepts_file(&self, file: &str) -> bool {
        match self {
            FileFilter::All => true,
            FileFilter::Files(files) => files
                .iter()
                .any(|wanted| file == wanted || Path::new(file).ends_with(wanted)),
        }
    }
}

impl FromStr for FileFilter {
    type Err = String;

    /// `all`, a single path, or a comma separated list of paths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(FileFilter::All);
        }
        let files: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if files.is_empty() {
            Ok(FileFilter::All)
        } else {
            Ok(FileFilter::Files(files))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub rank_by: RankBy,
    pub limit: usize,
    pub kind: KindFilter,
    pub file: FileFilter,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            rank_by: RankBy::default(),
            limit: DEFAULT_RESULT_LIMIT,
            kind: KindFilter::default(),
            file: FileFilter::default(),
        }
    }
}

impl QueryOptions {
    pub fn with_rank(mut self, rank_by: RankBy) -> Self {
        self.rank_by = rank_by;
        self
    }

    /// A zero limit keeps the default.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 { DEFAULT_RESULT_LIMIT } else { limit };
        self
    }

    pub fn with_kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_file(mut self, file: FileFilter) -> Self {
        self.file = file;
        self
    }

    /// Builds options from loosely typed request parameters. Every field that
    /// is missing or malformed keeps its default; malformed values are
    /// logged, never rejected.
    pub fn lenient(
        rank: Option<&str>,
        limit: Option<&str>,
        kind: Option<&str>,
        file: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            rank_by: parse_or(rank, "sort", defaults.rank_by),
            limit: limit
                .and_then(|l| match l.trim().parse::<usize>() {
                    Ok(n) if n > 0 => Some(n),
                    _ => {
                        warn!("ignoring invalid limit '{}'", l);
                        None
                    }
                })
                .unwrap_or(defaults.limit),
            kind: parse_or(kind, "type", defaults.kind),
            file: parse_or(file, "file", defaults.file),
        }
    }

    pub fn accepts(&self, reference: &Reference) -> bool {
        self.kind.accepts(reference) && self.file.accepts(reference)
    }
}

fn parse_or<T: FromStr<Err = String>>(value: Option<&str>, field: &str, default: T) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("ignoring invalid {} option: {}", field, e);
            default
        }),
    }
}
