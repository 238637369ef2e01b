//! Detection and removal of disable directives that suppressed nothing.
//!
//! This check runs after every other check has reported its findings: a
//! disable directive (or one entry of its check list) is unneeded when no
//! finding was actually silenced by it, and the fix deletes exactly the
//! useless part of the comment.

use std::collections::HashMap;

use quell_diagnostics::{Diagnostic, Edit, Fix, FixAvailability, Violation};
use quell_text_size::TextSize;

use crate::Finding;
use crate::directive::{Directive, Keyword};
use crate::line_range::DirectiveId;
use crate::registry::{CheckRegistry, UNNEEDED_DIRECTIVE};
use crate::source::ScannedSource;
use crate::table::SuppressionTable;

/// Violation: a disable directive (or one of its entries) silenced nothing.
#[derive(Debug, Clone)]
pub struct UnneededDirective {
    /// What is being disabled needlessly: "all checks" or the described
    /// check names.
    pub description: String,
}

impl Violation for UnneededDirective {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Sometimes;

    fn message(&self) -> String {
        format!("Unnecessary disabling of {}.", self.description)
    }

    fn fix_title(&self) -> Option<String> {
        Some("Remove the unnecessary disabling".to_string())
    }
}

/// Cross-reference `findings` against the suppression table and report every
/// disable directive, or directive entry, that silenced no finding.
///
/// Diagnostics come back ordered by the directive's byte offset. Each one
/// carries a deletion fix unless the directive's line ends inside a
/// multi-line string literal, in which case only the diagnostic is emitted.
pub fn check(
    findings: &[Finding],
    table: &SuppressionTable,
    registry: &CheckRegistry,
    source: &ScannedSource,
) -> Vec<Diagnostic> {
    let claimed = claimed_checks(findings, table);

    let mut candidates: Vec<(&Directive, Vec<String>)> = Vec::new();
    let no_claims = Vec::new();
    for (id, directive) in table.directives().iter().enumerate() {
        if directive.keyword() != Keyword::Disable {
            continue;
        }
        // A directive is exempt while this check is itself disabled there.
        if !table.is_enabled_at(UNNEEDED_DIRECTIVE, directive.line()) {
            continue;
        }

        let claimed_here = claimed.get(&id).unwrap_or(&no_claims);
        let unneeded: Vec<String> = directive
            .check_names()
            .iter()
            .filter(|name| name.as_str() != UNNEEDED_DIRECTIVE)
            .filter(|name| !claimed_here.contains(*name))
            .cloned()
            .collect();
        if !unneeded.is_empty() {
            candidates.push((directive, unneeded));
        }
    }

    candidates.sort_by_key(|(directive, _)| directive.range().start());

    let mut diagnostics = Vec::new();
    for (directive, unneeded) in &candidates {
        if unneeded.len() == directive.check_names().len() {
            diagnostics.push(whole_directive_diagnostic(directive, unneeded, registry, source));
        } else if !directive.all_checks() {
            // An `all` directive with some real use is never shrunk.
            for name in unneeded {
                if let Some(diagnostic) =
                    entry_diagnostic(directive, name, unneeded, registry, source)
                {
                    diagnostics.push(diagnostic);
                }
            }
        }
    }

    diagnostics
}

/// Which check names each directive actually silenced a finding for.
///
/// A finding covered by several ranges is claimed by exactly one directive:
/// an `all` directive wins over an explicit one, and among the rest the one
/// declared first wins.
fn claimed_checks(
    findings: &[Finding],
    table: &SuppressionTable,
) -> HashMap<DirectiveId, Vec<String>> {
    let mut by_check: HashMap<&str, Vec<&Finding>> = HashMap::new();
    for finding in findings {
        by_check
            .entry(finding.check_name.as_str())
            .or_default()
            .push(finding);
    }

    let mut claimed: HashMap<DirectiveId, Vec<String>> = HashMap::new();
    for (check_name, check_findings) in by_check {
        let ranges = table.ranges_for(check_name);
        if ranges.is_empty() {
            continue;
        }
        for finding in check_findings {
            let claiming = ranges
                .iter()
                .filter(|range| range.span().contains(finding.line))
                .min_by_key(|range| {
                    let directive = table.directive(range.begin());
                    (usize::from(!directive.all_checks()), directive.line())
                });
            if let Some(range) = claiming {
                claimed
                    .entry(range.begin())
                    .or_default()
                    .push(check_name.to_string());
            }
        }
    }

    claimed
}

fn whole_directive_diagnostic(
    directive: &Directive,
    unneeded: &[String],
    registry: &CheckRegistry,
    source: &ScannedSource,
) -> Diagnostic {
    let description = if directive.all_checks() {
        "all checks".to_string()
    } else {
        let mut names = unneeded.to_vec();
        names.sort();
        names
            .iter()
            .map(|name| describe(name, registry))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut diagnostic = Diagnostic::new(UnneededDirective { description }, directive.range());
    if let Some(edit) = whole_directive_deletion(directive, source) {
        diagnostic.set_fix(Fix::safe_edit(edit));
    }
    diagnostic
}

fn entry_diagnostic(
    directive: &Directive,
    name: &str,
    unneeded: &[String],
    registry: &CheckRegistry,
    source: &ScannedSource,
) -> Option<Diagnostic> {
    let range = directive.name_range(name)?;
    let mut diagnostic = Diagnostic::new(
        UnneededDirective {
            description: describe(name, registry),
        },
        range,
    );
    if let Some(edit) = entry_deletion(directive, name, unneeded, source) {
        diagnostic.set_fix(Fix::safe_edit(edit));
    }
    Some(diagnostic)
}

/// Label a check name for a message: known names verbatim, unknown ones with
/// a near-miss suggestion when one exists.
fn describe(name: &str, registry: &CheckRegistry) -> String {
    if registry.contains(name) {
        format!("`{name}`")
    } else if let Some(similar) = registry.suggest(name) {
        format!("`{name}` (did you mean `{similar}`?)")
    } else {
        format!("`{name}` (unknown check)")
    }
}

fn is_horizontal_ws(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

/// The deletion for a directive none of whose entries were needed: the
/// directive text plus preceding horizontal whitespace and, when the
/// directive does not open the file, the preceding line break. A directive
/// at byte offset 0 consumes its trailing line break instead.
///
/// Returns `None` when the directive's line ends inside a multi-line string
/// literal, where splicing could corrupt the literal.
fn whole_directive_deletion(directive: &Directive, source: &ScannedSource) -> Option<Edit> {
    if !source.eol_editable(directive.line()) {
        return None;
    }

    let bytes = source.text().as_bytes();
    let opens_file = directive.range().start() == TextSize::new(0);
    let mut start = usize::from(directive.range().start());
    let mut end = usize::from(directive.range().end());

    while start > 0 && is_horizontal_ws(bytes[start - 1]) {
        start -= 1;
    }
    while end < bytes.len() && is_horizontal_ws(bytes[end]) {
        end += 1;
    }

    if opens_file {
        if end < bytes.len() && bytes[end] == b'\r' {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'\n' {
            end += 1;
        }
    } else if start > 0 && bytes[start - 1] == b'\n' {
        start -= 1;
        if start > 0 && bytes[start - 1] == b'\r' {
            start -= 1;
        }
    }

    Some(Edit::deletion(
        TextSize::new(start as u32),
        TextSize::new(end as u32),
    ))
}

/// The deletion for one unneeded entry of a multi-entry list, widened so
/// that no combination of entry removals leaves a dangling or doubled comma
/// or stray spaces before the end of the line.
fn entry_deletion(
    directive: &Directive,
    name: &str,
    unneeded: &[String],
    source: &ScannedSource,
) -> Option<Edit> {
    let bytes = source.text().as_bytes();
    let range = directive.name_range(name)?;

    // Does a surviving entry still follow this one in the list?
    let kept_follows = directive
        .named_ranges()
        .filter(|(_, other)| other.start() > range.start())
        .any(|(other_name, _)| !unneeded.iter().any(|removed| removed == other_name));

    let mut start = usize::from(range.start());
    let mut end = usize::from(range.end());

    if kept_follows {
        // Eat the comma on the right and its surrounding spaces.
        while end < bytes.len() && is_horizontal_ws(bytes[end]) {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b',' {
            end += 1;
            while end < bytes.len() && is_horizontal_ws(bytes[end]) {
                end += 1;
            }
        }
    } else {
        // Nothing kept after this entry: eat the comma on the left so the
        // surviving prefix does not end in one.
        while start > 0 && is_horizontal_ws(bytes[start - 1]) {
            start -= 1;
        }
        if start > 0 && bytes[start - 1] == b',' {
            start -= 1;
            while start > 0 && is_horizontal_ws(bytes[start - 1]) {
                start -= 1;
            }
        }
    }

    Some(Edit::deletion(
        TextSize::new(start as u32),
        TextSize::new(end as u32),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_labels_known_and_unknown_names() {
        let registry = CheckRegistry::builtin();
        assert_eq!(
            describe("Metrics/MethodLength", &registry),
            "`Metrics/MethodLength`"
        );
        assert_eq!(
            describe("Metrics/MethodLenght", &registry),
            "`Metrics/MethodLenght` (did you mean `Metrics/MethodLength`?)"
        );
        assert_eq!(describe("KlassLength", &registry), "`KlassLength` (unknown check)");
    }

    #[test]
    fn message_phrasing() {
        let violation = UnneededDirective {
            description: "all checks".to_string(),
        };
        assert_eq!(violation.message(), "Unnecessary disabling of all checks.");
    }
}
