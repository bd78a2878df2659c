use std::fmt;
use std::sync::Arc;

/// A location in an SDL source file.
///
/// Lines and columns are 1-based, columns count characters. `offset` is the byte
/// offset into the source and is what diagnostic spans are built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub file: Arc<str>,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(file: Arc<str>, line: usize, column: usize, offset: usize) -> Self {
        Position {
            file,
            line,
            column,
            offset,
        }
    }

    /// The first character of `file`.
    pub fn start_of(file: Arc<str>) -> Self {
        Position::new(file, 1, 1, 0)
    }

    /// Key used for deterministic ordering: file, then line, then column.
    pub fn sort_key(&self) -> (&str, usize, usize) {
        (&self.file, self.line, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
