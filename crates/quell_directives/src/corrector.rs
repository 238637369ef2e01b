//! Batch application of fix edits to a source buffer.

use quell_diagnostics::{Applicability, Diagnostic, Edit};
use quell_text_size::Ranged;

/// The outcome of applying a file's fixes.
#[derive(Debug)]
pub struct FixResult {
    /// The corrected source text.
    pub code: String,
    /// Number of fixes applied.
    pub applied: usize,
    /// Number of diagnostics whose fix was missing or not applicable.
    pub unapplied: usize,
}

/// Apply every applicable fix from `diagnostics` to `source` in one batch.
pub fn apply_fixes(
    source: &str,
    diagnostics: &[Diagnostic],
    applicability: Applicability,
) -> FixResult {
    let mut edits: Vec<Edit> = Vec::new();
    let mut applied = 0;
    let mut unapplied = 0;

    for diagnostic in diagnostics {
        match &diagnostic.fix {
            Some(fix) if fix.applies(applicability) => {
                edits.extend(fix.edits().iter().cloned());
                applied += 1;
            }
            _ => unapplied += 1,
        }
    }

    // Sort edits by position (descending) to apply from end to start.
    edits.sort_by_key(|edit| std::cmp::Reverse((edit.start(), edit.end())));
    let edits = remove_overlapping_edits(edits);

    FixResult {
        code: apply_edits(source, &edits),
        applied,
        unapplied,
    }
}

/// Remove overlapping edits, keeping the first one (highest start position).
/// Expects `edits` sorted descending by start.
pub fn remove_overlapping_edits(edits: Vec<Edit>) -> Vec<Edit> {
    let mut result: Vec<Edit> = Vec::new();

    for edit in edits {
        // Since edits are sorted descending by start, accepted edits start at
        // or after this one; an overlap occurs if this edit reaches past an
        // accepted start.
        let overlaps = result
            .iter()
            .any(|existing| edit.end() > existing.start());

        if !overlaps {
            result.push(edit);
        }
    }

    result
}

/// Apply edits to source text. Expects `edits` sorted descending by start
/// and non-overlapping.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut result = source.to_string();

    for edit in edits {
        let start = usize::from(edit.start());
        let end = usize::from(edit.end());
        let content = edit.content().unwrap_or("");

        result.replace_range(start..end, content);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use quell_text_size::TextSize;

    fn deletion(start: u32, end: u32) -> Edit {
        Edit::deletion(TextSize::new(start), TextSize::new(end))
    }

    #[test]
    fn applies_deletions_back_to_front() {
        let source = "abcdef";
        let mut edits = vec![deletion(0, 1), deletion(3, 5)];
        edits.sort_by_key(|edit| std::cmp::Reverse(edit.start()));
        assert_eq!(apply_edits(source, &edits), "bcf");
    }

    #[test]
    fn drops_overlapping_edit() {
        let edits = vec![deletion(3, 6), deletion(1, 4)];
        let kept = remove_overlapping_edits(edits);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start(), TextSize::new(3));
    }

    #[test]
    fn keeps_adjacent_deletions() {
        let edits = vec![deletion(3, 6), deletion(1, 3)];
        let kept = remove_overlapping_edits(edits);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn insertion_replaces_nothing() {
        let edits = vec![Edit::insertion(" # mark".to_string(), TextSize::new(6))];
        assert_eq!(apply_edits("puts 1\n", &edits), "puts 1 # mark\n");
    }
}
