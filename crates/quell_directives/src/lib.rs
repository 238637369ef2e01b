//! Suppression-directive engine for a static-analysis pipeline.
//!
//! The engine turns `# quell:disable`/`# quell:enable` comments into
//! per-check line ranges during which findings are silenced. Given the
//! findings every other check actually reported, it then flags the
//! directives that silenced nothing and computes the exact edits that
//! delete them.

pub mod corrector;
pub mod directive;
pub mod insert;
pub mod line_range;
pub mod registry;
pub mod source;
pub mod table;
pub mod unneeded;

pub use corrector::{FixResult, apply_fixes};
pub use directive::{DIRECTIVE_MARKER, Directive, DirectiveGroup, Keyword, parse_comment};
pub use insert::disable_directive_edit;
pub use line_range::{DirectiveId, LineSpan, SuppressionRange};
pub use registry::{CheckRegistry, UNNEEDED_DIRECTIVE};
pub use source::{Comment, ScannedSource};
pub use table::SuppressionTable;
pub use unneeded::UnneededDirective;

use quell_diagnostics::{Applicability, Diagnostic};

/// A finding reported by some other check: the input the unneeded-directive
/// analysis cross-references against the suppression table. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Canonical name of the check that fired.
    pub check_name: String,
    /// 1-based source line of the finding.
    pub line: usize,
    /// Human-readable message; carried through for reporting only.
    pub message: String,
}

impl Finding {
    pub fn new(check_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            line,
            message: message.into(),
        }
    }
}

/// Parse every directive out of a scanned source, in source order.
pub fn parse_directives(scanned: &ScannedSource, registry: &CheckRegistry) -> Vec<Directive> {
    let mut directives = Vec::new();
    for comment in scanned.comments() {
        directives.extend(parse_comment(
            scanned.comment_text(comment),
            comment.range.start(),
            comment.line,
            registry,
        ));
    }
    directives
}

/// Build the suppression table for a source text.
pub fn suppression_table(source: &str, registry: &CheckRegistry) -> SuppressionTable {
    let scanned = ScannedSource::scan(source);
    let directives = parse_directives(&scanned, registry);
    SuppressionTable::build(directives, scanned.code_lines())
}

/// Run the unneeded-directive analysis over one file.
///
/// `findings` are the reports of every other check for this file, before
/// suppression filtering. Diagnostics come back ordered by source position,
/// each with a deletion fix where one can be computed safely.
pub fn check_source(
    source: &str,
    findings: &[Finding],
    registry: &CheckRegistry,
) -> Vec<Diagnostic> {
    let scanned = ScannedSource::scan(source);
    let directives = parse_directives(&scanned, registry);
    let table = SuppressionTable::build(directives, scanned.code_lines());
    unneeded::check(findings, &table, registry, &scanned)
}

/// Run the analysis and apply every safe fix in one batch.
pub fn fix_source(source: &str, findings: &[Finding], registry: &CheckRegistry) -> FixResult {
    let diagnostics = check_source(source, findings, registry);
    apply_fixes(source, &diagnostics, Applicability::Safe)
}
