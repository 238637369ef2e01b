//! Line/column bookkeeping for source files.
//!
//! `LineIndex` records the start offset of every line once, so that
//! offset → line/column queries are a binary search instead of a rescan.

use std::fmt;
use std::num::NonZeroUsize;

use quell_text_size::{TextRange, TextSize};

/// A 1-based line or column number.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneIndexed(NonZeroUsize);

impl OneIndexed {
    /// The smallest value, 1.
    pub const MIN: Self = Self(NonZeroUsize::MIN);

    /// Create from a 1-based value; `None` if `value` is zero.
    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(Self)
    }

    /// Create from a 0-based value.
    pub fn from_zero_indexed(value: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(value))
    }

    /// The 1-based value.
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// The 0-based value.
    pub const fn to_zero_indexed(self) -> usize {
        self.0.get() - 1
    }

    pub fn saturating_add(self, rhs: usize) -> Self {
        Self(self.0.saturating_add(rhs))
    }
}

impl fmt::Debug for OneIndexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Display for OneIndexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// A 1-based line/column pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: OneIndexed,
    pub column: OneIndexed,
}

/// Start offsets of every line in a source file.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    /// Build the index in one pass over `text`.
    pub fn from_source_text(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(TextSize::default());
        for newline in memchr::memchr_iter(b'\n', text.as_bytes()) {
            line_starts.push(TextSize::new(newline as u32 + 1));
        }
        Self { line_starts }
    }

    /// Number of lines (a trailing newline does not open a new line unless
    /// text follows it; an empty file has one line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The line containing `offset`.
    pub fn line_index(&self, offset: TextSize) -> OneIndexed {
        match self.line_starts.binary_search(&offset) {
            Ok(row) => OneIndexed::from_zero_indexed(row),
            Err(next_row) => OneIndexed::from_zero_indexed(next_row - 1),
        }
    }

    /// Start offset of `line`, clamped to the end of `source` for lines past
    /// the last one.
    pub fn line_start(&self, line: OneIndexed, source: &str) -> TextSize {
        self.line_starts
            .get(line.to_zero_indexed())
            .copied()
            .unwrap_or_else(|| TextSize::of(source))
    }

    /// End offset of `line`, excluding its line terminator.
    pub fn line_end(&self, line: OneIndexed, source: &str) -> TextSize {
        let end = self.full_line_end(line, source);
        let mut end = usize::from(end);
        let bytes = source.as_bytes();
        if end > 0 && bytes[end - 1] == b'\n' {
            end -= 1;
            if end > 0 && bytes[end - 1] == b'\r' {
                end -= 1;
            }
        }
        TextSize::new(end as u32)
    }

    /// End offset of `line`, including its line terminator.
    pub fn full_line_end(&self, line: OneIndexed, source: &str) -> TextSize {
        self.line_starts
            .get(line.get())
            .copied()
            .unwrap_or_else(|| TextSize::of(source))
    }

    /// The byte range of `line`, excluding its line terminator.
    pub fn line_range(&self, line: OneIndexed, source: &str) -> TextRange {
        TextRange::new(self.line_start(line, source), self.line_end(line, source))
    }
}

/// A source text paired with its line index.
#[derive(Debug, Copy, Clone)]
pub struct SourceCode<'src, 'index> {
    text: &'src str,
    index: &'index LineIndex,
}

impl<'src, 'index> SourceCode<'src, 'index> {
    pub fn new(text: &'src str, index: &'index LineIndex) -> Self {
        Self { text, index }
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    /// The 1-based line/column of `offset`. Columns count characters, not
    /// bytes.
    pub fn line_column(&self, offset: TextSize) -> SourceLocation {
        let line = self.index.line_index(offset);
        let line_start = self.index.line_start(line, self.text);
        let column = self.text[TextRange::new(line_start, offset)].chars().count();
        SourceLocation {
            line,
            column: OneIndexed::from_zero_indexed(column),
        }
    }

    pub fn line_index(&self, offset: TextSize) -> OneIndexed {
        self.index.line_index(offset)
    }

    pub fn line_start(&self, line: OneIndexed) -> TextSize {
        self.index.line_start(line, self.text)
    }

    pub fn line_end(&self, line: OneIndexed) -> TextSize {
        self.index.line_end(line, self.text)
    }

    /// The text of `line`, without its line terminator.
    pub fn line_text(&self, line: OneIndexed) -> &'src str {
        &self.text[self.index.line_range(line, self.text)]
    }
}
