//! Source locations.

use std::fmt;

/// A 1-based line/column position inside a source.
///
/// The source name is not stored here; it belongs to the function that
/// owns the location (see `FunctionDef::source`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Create a new location.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        SourceLocation { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
