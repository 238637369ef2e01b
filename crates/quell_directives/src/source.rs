//! Lightweight source scanning for `#`-comment languages.
//!
//! The suppression engine only needs three facts about a source file: where
//! its comments are, which lines carry non-comment tokens, and which string
//! literals span multiple lines. One forward byte scan collects all three
//! without a real parser.

use std::collections::HashSet;

use quell_source_file::{LineIndex, OneIndexed};
use quell_text_size::{TextRange, TextSize};

/// One comment: its byte range (without the line terminator) and its
/// 1-based starting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub range: TextRange,
    pub line: usize,
}

/// The scan results for one source file.
#[derive(Debug)]
pub struct ScannedSource<'src> {
    text: &'src str,
    comments: Vec<Comment>,
    code_lines: HashSet<usize>,
    /// Byte ranges of string literals that span more than one line.
    string_spans: Vec<TextRange>,
    line_index: LineIndex,
}

impl<'src> ScannedSource<'src> {
    /// Scan `text` in a single pass.
    pub fn scan(text: &'src str) -> Self {
        let bytes = text.as_bytes();
        let mut comments = Vec::new();
        let mut code_lines = HashSet::new();
        let mut string_spans = Vec::new();

        let mut line = 1usize;
        let mut pos = 0usize;
        // (delimiter, start offset, start line) of an open string literal
        let mut open_string: Option<(u8, usize, usize)> = None;

        while pos < bytes.len() {
            let byte = bytes[pos];

            if let Some((delimiter, start, start_line)) = open_string {
                match byte {
                    b'\\' => {
                        // The escaped byte may itself be a line terminator.
                        if bytes.get(pos + 1) == Some(&b'\n') {
                            line += 1;
                        }
                        pos += 1;
                    }
                    b'\n' => line += 1,
                    _ if byte == delimiter => {
                        if start_line != line {
                            string_spans.push(TextRange::new(
                                TextSize::new(start as u32),
                                TextSize::new(pos as u32 + 1),
                            ));
                        }
                        open_string = None;
                    }
                    _ => {
                        if !byte.is_ascii_whitespace() {
                            code_lines.insert(line);
                        }
                    }
                }
                pos += 1;
                continue;
            }

            match byte {
                b'#' => {
                    let mut end = memchr::memchr(b'\n', &bytes[pos..])
                        .map_or(bytes.len(), |offset| pos + offset);
                    let comment_end = if end > pos && bytes[end - 1] == b'\r' {
                        end - 1
                    } else {
                        end
                    };
                    comments.push(Comment {
                        range: TextRange::new(
                            TextSize::new(pos as u32),
                            TextSize::new(comment_end as u32),
                        ),
                        line,
                    });
                    if end < bytes.len() {
                        line += 1;
                        end += 1;
                    }
                    pos = end;
                }
                b'\'' | b'"' => {
                    code_lines.insert(line);
                    open_string = Some((byte, pos, line));
                    pos += 1;
                }
                b'\n' => {
                    line += 1;
                    pos += 1;
                }
                _ => {
                    if !byte.is_ascii_whitespace() {
                        code_lines.insert(line);
                    }
                    pos += 1;
                }
            }
        }

        // A string still open at end of file counts as multi-line when it
        // crossed at least one line boundary.
        if let Some((_, start, start_line)) = open_string
            && start_line != line
        {
            string_spans.push(TextRange::new(
                TextSize::new(start as u32),
                TextSize::of(text),
            ));
        }

        Self {
            text,
            comments,
            code_lines,
            string_spans,
            line_index: LineIndex::from_source_text(text),
        }
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment_text(&self, comment: &Comment) -> &'src str {
        &self.text[comment.range]
    }

    /// 1-based lines that carry non-comment tokens.
    pub fn code_lines(&self) -> &HashSet<usize> {
        &self.code_lines
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Byte ranges of string literals spanning more than one line.
    pub fn string_spans(&self) -> &[TextRange] {
        &self.string_spans
    }

    /// Whether text may be spliced at the end of `line` without landing
    /// inside a multi-line string literal.
    pub fn eol_editable(&self, line: usize) -> bool {
        let Some(line) = OneIndexed::new(line) else {
            return false;
        };
        let eol = self.line_index.line_end(line, self.text);
        !self
            .string_spans
            .iter()
            .any(|span| span.contains(eol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_full_line_and_trailing_comments() {
        let text = "puts 1\n# a comment\nputs 2 # trailing\n";
        let scanned = ScannedSource::scan(text);

        assert_eq!(scanned.comments().len(), 2);
        assert_eq!(scanned.comment_text(&scanned.comments()[0]), "# a comment");
        assert_eq!(scanned.comments()[0].line, 2);
        assert_eq!(scanned.comment_text(&scanned.comments()[1]), "# trailing");
        assert_eq!(scanned.comments()[1].line, 3);
    }

    #[test]
    fn code_lines_exclude_comment_only_lines() {
        let text = "puts 1\n# a comment\n\nputs 2 # trailing\n";
        let scanned = ScannedSource::scan(text);

        assert!(scanned.code_lines().contains(&1));
        assert!(!scanned.code_lines().contains(&2));
        assert!(!scanned.code_lines().contains(&3));
        assert!(scanned.code_lines().contains(&4));
    }

    #[test]
    fn hash_inside_string_is_not_a_comment() {
        let text = "puts \"# not a comment\"\n";
        let scanned = ScannedSource::scan(text);
        assert!(scanned.comments().is_empty());
        assert!(scanned.code_lines().contains(&1));
    }

    #[test]
    fn escaped_quote_does_not_close_string() {
        let text = "puts \"a\\\"b\" # real comment\n";
        let scanned = ScannedSource::scan(text);
        assert_eq!(scanned.comments().len(), 1);
        assert_eq!(scanned.comment_text(&scanned.comments()[0]), "# real comment");
    }

    #[test]
    fn multi_line_string_is_recorded() {
        let text = "x = \"abc\ndef\"\ny = 1\n";
        let scanned = ScannedSource::scan(text);

        assert_eq!(scanned.string_spans().len(), 1);
        assert_eq!(&text[scanned.string_spans()[0]], "\"abc\ndef\"");
        assert!(!scanned.eol_editable(1));
        assert!(scanned.eol_editable(2));
        assert!(scanned.eol_editable(3));
    }

    #[test]
    fn single_line_string_is_not_recorded() {
        let scanned = ScannedSource::scan("x = \"abc\"\n");
        assert!(scanned.string_spans().is_empty());
        assert!(scanned.eol_editable(1));
    }

    #[test]
    fn unterminated_multi_line_string_blocks_editing() {
        let text = "x = \"abc\ndef";
        let scanned = ScannedSource::scan(text);
        assert_eq!(scanned.string_spans().len(), 1);
        assert!(!scanned.eol_editable(1));
    }

    #[test]
    fn crlf_comment_excludes_carriage_return() {
        let text = "# first\r\nputs 1\r\n";
        let scanned = ScannedSource::scan(text);
        assert_eq!(scanned.comment_text(&scanned.comments()[0]), "# first");
    }

    #[test]
    fn comment_at_end_of_file_without_newline() {
        let text = "puts 1\n# last";
        let scanned = ScannedSource::scan(text);
        assert_eq!(scanned.comments().len(), 1);
        assert_eq!(scanned.comment_text(&scanned.comments()[0]), "# last");
        assert_eq!(scanned.comments()[0].line, 2);
    }
}
