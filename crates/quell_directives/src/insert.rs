//! Appending a disable directive for a finding that cannot be fixed.
//!
//! When the host tool is asked to silence an uncorrectable finding instead
//! of fixing it, the edit appends `# quell:disable <Check>` to the end of
//! the finding's line.

use quell_diagnostics::Edit;
use quell_source_file::OneIndexed;

use crate::directive::DIRECTIVE_MARKER;
use crate::registry::UNNEEDED_DIRECTIVE;
use crate::source::ScannedSource;

/// The edit that silences `check_name` on `line` by appending a disable
/// directive at the end of that line.
///
/// Returns `None` for the unneeded-directive check itself (silencing the
/// silencer would hide every other insertion), for lines past the end of the
/// file, and for lines whose end sits inside a multi-line string literal
/// where an appended comment would become literal text.
pub fn disable_directive_edit(
    check_name: &str,
    line: usize,
    source: &ScannedSource,
) -> Option<Edit> {
    if check_name == UNNEEDED_DIRECTIVE {
        return None;
    }
    if !source.eol_editable(line) {
        return None;
    }
    let line = OneIndexed::new(line)?;
    if line.get() > source.line_index().line_count() {
        return None;
    }

    let end = source.line_index().line_end(line, source.text());
    Some(Edit::insertion(
        format!(" # {DIRECTIVE_MARKER}:disable {check_name}"),
        end,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corrector::apply_edits;

    #[test]
    fn appends_directive_at_end_of_line() {
        let text = "puts 1\nputs 2\n";
        let scanned = ScannedSource::scan(text);
        let edit = disable_directive_edit("Layout/LineLength", 1, &scanned).unwrap();
        assert_eq!(
            apply_edits(text, &[edit]),
            "puts 1 # quell:disable Layout/LineLength\nputs 2\n"
        );
    }

    #[test]
    fn appends_on_last_line_without_newline() {
        let text = "puts 1";
        let scanned = ScannedSource::scan(text);
        let edit = disable_directive_edit("Lint/Debugger", 1, &scanned).unwrap();
        assert_eq!(
            apply_edits(text, &[edit]),
            "puts 1 # quell:disable Lint/Debugger"
        );
    }

    #[test]
    fn refuses_inside_multi_line_string() {
        let text = "x = \"abc\ndef\"\n";
        let scanned = ScannedSource::scan(text);
        assert!(disable_directive_edit("Lint/Debugger", 1, &scanned).is_none());
        assert!(disable_directive_edit("Lint/Debugger", 2, &scanned).is_some());
    }

    #[test]
    fn refuses_the_self_check() {
        let scanned = ScannedSource::scan("puts 1\n");
        assert!(disable_directive_edit(UNNEEDED_DIRECTIVE, 1, &scanned).is_none());
    }

    #[test]
    fn refuses_lines_past_end_of_file() {
        let scanned = ScannedSource::scan("puts 1\n");
        assert!(disable_directive_edit("Lint/Debugger", 9, &scanned).is_none());
    }
}
