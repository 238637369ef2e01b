//! Building the per-check suppression table from a file's directives.

use std::collections::{HashMap, HashSet};

use crate::directive::Directive;
use crate::line_range::{DirectiveId, SuppressionRange};

/// Per-check suppression ranges for one file, plus the directives they came
/// from. Built once per analysis pass and read-only afterwards.
#[derive(Debug, Default)]
pub struct SuppressionTable {
    directives: Vec<Directive>,
    ranges: HashMap<String, Vec<SuppressionRange>>,
}

impl SuppressionTable {
    /// Build the table from a file's directives, ordered by source position.
    ///
    /// `code_lines` is the set of 1-based line numbers carrying non-comment
    /// tokens; a directive on such a line silences its checks for that line
    /// only, while a directive on a comment-only line opens (or closes) a
    /// multi-line range.
    ///
    /// A check may be disabled again before being re-enabled: open
    /// directives stack, and a closing directive ends every open range for
    /// its checks at once. Anything still open at end of file becomes an
    /// open-ended range.
    pub fn build(directives: Vec<Directive>, code_lines: &HashSet<usize>) -> Self {
        let mut ranges: HashMap<String, Vec<SuppressionRange>> = HashMap::new();
        // check name -> stack of open disable directives, oldest first
        let mut open: HashMap<String, Vec<DirectiveId>> = HashMap::new();

        for (id, directive) in directives.iter().enumerate() {
            let single_line = code_lines.contains(&directive.line());
            match (single_line, directive.keyword().opens()) {
                (true, true) => {
                    for name in directive.check_names() {
                        ranges.entry(name.clone()).or_default().push(
                            SuppressionRange::closed(
                                name.clone(),
                                id,
                                directive.line(),
                                id,
                                directive.line(),
                            ),
                        );
                    }
                }
                // A single-line enable is parsed but has no effect.
                (true, false) => {}
                (false, true) => {
                    for name in directive.check_names() {
                        open.entry(name.clone()).or_default().push(id);
                    }
                }
                (false, false) => {
                    for name in directive.check_names() {
                        let Some(opened) = open.remove(name) else {
                            continue;
                        };
                        let target = ranges.entry(name.clone()).or_default();
                        for begin in opened {
                            target.push(SuppressionRange::closed(
                                name.clone(),
                                begin,
                                directives[begin].line(),
                                id,
                                directive.line(),
                            ));
                        }
                    }
                }
            }
        }

        for (name, opened) in open {
            let target = ranges.entry(name.clone()).or_default();
            for begin in opened {
                target.push(SuppressionRange::open_ended(
                    name.clone(),
                    begin,
                    directives[begin].line(),
                ));
            }
        }

        Self { directives, ranges }
    }

    /// All directives in source order.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// The directive a range's id refers to.
    pub fn directive(&self, id: DirectiveId) -> &Directive {
        &self.directives[id]
    }

    /// Suppression ranges for one check, in discovery order.
    pub fn ranges_for(&self, check_name: &str) -> &[SuppressionRange] {
        self.ranges
            .get(check_name)
            .map_or(&[], Vec::as_slice)
    }

    /// Checks that have at least one range.
    pub fn suppressed_checks(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    /// Whether `check_name` is active (not silenced) at `line`.
    pub fn is_enabled_at(&self, check_name: &str, line: usize) -> bool {
        self.ranges_for(check_name)
            .iter()
            .all(|range| !range.span().contains(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::parse_comment;
    use crate::line_range::LineSpan;
    use crate::registry::CheckRegistry;
    use quell_text_size::TextSize;

    /// Parse each `(text, line)` pair as a standalone comment.
    fn directives(comments: &[(&str, usize)]) -> Vec<Directive> {
        let registry = CheckRegistry::builtin();
        comments
            .iter()
            .flat_map(|(text, line)| parse_comment(text, TextSize::new(0), *line, &registry))
            .collect()
    }

    fn build(comments: &[(&str, usize)], code_lines: &[usize]) -> SuppressionTable {
        SuppressionTable::build(
            directives(comments),
            &code_lines.iter().copied().collect(),
        )
    }

    #[test]
    fn multi_line_pair_produces_bounded_range() {
        let table = build(
            &[
                ("# quell:disable Metrics/MethodLength", 1),
                ("# quell:enable Metrics/MethodLength", 5),
            ],
            &[2, 3, 4],
        );

        let ranges = table.ranges_for("Metrics/MethodLength");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].span(), LineSpan::Bounded { start: 1, end: 5 });
        assert!(!ranges[0].is_single_line());
    }

    #[test]
    fn unclosed_disable_is_open_ended() {
        let table = build(&[("# quell:disable Lint/Debugger", 3)], &[1, 2]);

        let ranges = table.ranges_for("Lint/Debugger");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].span(), LineSpan::OpenEnded { start: 3 });
        assert_eq!(ranges[0].end(), None);
    }

    #[test]
    fn directive_on_code_line_covers_that_line_only() {
        let table = build(&[("# quell:disable Layout/Tab", 4)], &[4]);

        let ranges = table.ranges_for("Layout/Tab");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].span(), LineSpan::Bounded { start: 4, end: 4 });
        assert!(ranges[0].is_single_line());
        assert!(table.is_enabled_at("Layout/Tab", 5));
        assert!(!table.is_enabled_at("Layout/Tab", 4));
    }

    #[test]
    fn single_line_enable_has_no_effect() {
        let table = build(
            &[
                ("# quell:disable Layout/Tab", 1),
                ("# quell:enable Layout/Tab", 3),
            ],
            &[3],
        );

        // The enable sits on a code line, so the disable stays open.
        let ranges = table.ranges_for("Layout/Tab");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].span(), LineSpan::OpenEnded { start: 1 });
    }

    #[test]
    fn stacked_disables_each_get_a_range() {
        let table = build(
            &[
                ("# quell:disable Style/ClassVars", 1),
                ("# quell:disable Style/ClassVars", 3),
                ("# quell:enable Style/ClassVars", 7),
            ],
            &[2, 4, 5, 6],
        );

        let ranges = table.ranges_for("Style/ClassVars");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].span(), LineSpan::Bounded { start: 1, end: 7 });
        assert_eq!(ranges[1].span(), LineSpan::Bounded { start: 3, end: 7 });
        assert_ne!(ranges[0].begin(), ranges[1].begin());
        assert_eq!(ranges[0].end(), ranges[1].end());
    }

    #[test]
    fn enable_without_open_disable_is_ignored() {
        let table = build(&[("# quell:enable Metrics/AbcSize", 2)], &[]);
        assert!(table.ranges_for("Metrics/AbcSize").is_empty());
        assert!(table.is_enabled_at("Metrics/AbcSize", 2));
    }

    #[test]
    fn todo_opens_and_end_todo_closes() {
        let table = build(
            &[
                ("# quell:todo Naming/MethodName", 1),
                ("# quell:end_todo Naming/MethodName", 4),
            ],
            &[2, 3],
        );

        let ranges = table.ranges_for("Naming/MethodName");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].span(), LineSpan::Bounded { start: 1, end: 4 });
    }

    #[test]
    fn enable_closes_only_named_checks() {
        let table = build(
            &[
                ("# quell:disable Layout/Tab, Lint/Debugger", 1),
                ("# quell:enable Layout/Tab", 4),
            ],
            &[2, 3],
        );

        assert_eq!(
            table.ranges_for("Layout/Tab")[0].span(),
            LineSpan::Bounded { start: 1, end: 4 }
        );
        assert_eq!(
            table.ranges_for("Lint/Debugger")[0].span(),
            LineSpan::OpenEnded { start: 1 }
        );
    }

    #[test]
    fn disable_all_covers_every_known_check_except_self() {
        let table = build(&[("# quell:disable all", 1)], &[]);

        assert!(!table.is_enabled_at("Metrics/MethodLength", 10));
        assert!(!table.is_enabled_at("Style/ClassVars", 2));
        assert!(table.is_enabled_at(crate::registry::UNNEEDED_DIRECTIVE, 1));
    }

    #[test]
    fn is_enabled_at_true_for_unmentioned_check() {
        let table = build(&[("# quell:disable Layout/Tab", 1)], &[]);
        assert!(table.is_enabled_at("Metrics/AbcSize", 1));
    }
}
