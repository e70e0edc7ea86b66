use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an identifier occurs in the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// Identity (`Function::info`) of the function whose body contains this
    /// location, filled in by scope resolution.
    #[serde(default)]
    pub within: Option<String>,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
            within: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
