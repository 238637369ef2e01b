//! A single text edit: delete, insert, or replace one byte range.

use std::cmp::Ordering;

use get_size2::GetSize;
use quell_text_size::{Ranged, TextRange, TextSize};

/// A change to a source file.
#[derive(Debug, Clone, PartialEq, Eq, GetSize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edit {
    /// The range to replace.
    range: TextRange,
    /// The replacement text; `None` for a pure deletion.
    content: Option<String>,
}

impl Edit {
    /// Replace `range` with `content`.
    pub fn replacement(content: String, start: TextSize, end: TextSize) -> Self {
        debug_assert!(!content.is_empty(), "an empty replacement is a deletion");
        Self {
            range: TextRange::new(start, end),
            content: Some(content),
        }
    }

    /// Delete `start..end`.
    pub fn deletion(start: TextSize, end: TextSize) -> Self {
        Self {
            range: TextRange::new(start, end),
            content: None,
        }
    }

    /// Delete `range`.
    pub fn range_deletion(range: TextRange) -> Self {
        Self {
            range,
            content: None,
        }
    }

    /// Insert `content` at `offset`.
    pub fn insertion(content: String, offset: TextSize) -> Self {
        debug_assert!(!content.is_empty(), "an empty insertion is a no-op");
        Self {
            range: TextRange::empty(offset),
            content: Some(content),
        }
    }

    /// The replacement text, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_deletion(&self) -> bool {
        self.content.is_none()
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && self.content.is_some()
    }
}

impl Ranged for Edit {
    fn range(&self) -> TextRange {
        self.range
    }
}

impl Ord for Edit {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start(), self.end(), &self.content).cmp(&(other.start(), other.end(), &other.content))
    }
}

impl PartialOrd for Edit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletion_has_no_content() {
        let edit = Edit::deletion(TextSize::new(2), TextSize::new(5));
        assert!(edit.is_deletion());
        assert_eq!(edit.content(), None);
        assert_eq!(edit.range(), TextRange::new(TextSize::new(2), TextSize::new(5)));
    }

    #[test]
    fn insertion_is_empty_range() {
        let edit = Edit::insertion("x".to_string(), TextSize::new(3));
        assert!(edit.is_insertion());
        assert_eq!(edit.start(), edit.end());
        assert_eq!(edit.content(), Some("x"));
    }

    #[test]
    fn edits_order_by_position() {
        let a = Edit::deletion(TextSize::new(1), TextSize::new(2));
        let b = Edit::deletion(TextSize::new(3), TextSize::new(4));
        assert!(a < b);
    }
}
