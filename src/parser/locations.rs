#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column within the line.
    pub column: usize,
}

impl Location {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Start of an input with no tokens at all.
    pub const fn origin() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} char {}", self.line, self.column + 1)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

/// Source range covered by a token, end exclusive.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub const fn new(line: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            start: Location::new(line, start_col),
            end: Location::new(line, end_col),
        }
    }

    pub const fn empty(at: Location) -> Self {
        Self { start: at, end: at }
    }

    pub fn till<R: Locatable>(&self, other: &R) -> Self {
        Self {
            start: self.start,
            end: other.span().end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}
