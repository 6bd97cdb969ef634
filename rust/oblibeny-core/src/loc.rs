//! Source locations attached to syntax tree nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a node in the original source, as reported by the upstream
/// parser. Line and column are 1-based; `0:0` marks a synthetic node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLoc {
    pub line: usize,
    pub col: usize,
}

impl SourceLoc {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Location for synthetic nodes (tests, generated trees).
    pub fn dummy() -> Self {
        Self { line: 0, col: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.line == 0 && self.col == 0
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
