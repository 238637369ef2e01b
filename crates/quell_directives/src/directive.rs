//! Parsing of `# quell:` suppression directives out of comment text.
//!
//! A single comment may carry several directive fragments; each fragment is
//! a marker, a keyword, and either `all` or a comma-separated check list,
//! optionally followed by free text that is kept only as a description.

use lazy_static::lazy_static;
use regex::Regex;

use quell_text_size::{TextRange, TextSize};

use crate::registry::CheckRegistry;

/// The literal marker that introduces a directive inside a comment.
pub const DIRECTIVE_MARKER: &str = "quell";

lazy_static! {
    /// One directive fragment: marker, keyword, and the check list. The
    /// description is not part of the match; it runs from the end of the
    /// list to the next fragment or the end of the comment.
    static ref FRAGMENT: Regex = Regex::new(
        r"#\s*quell\s*:\s*(?P<keyword>disable|enable|end_todo|todo)\b\s*(?P<checks>all\b|(?:[A-Z]\w+/)?[A-Z]\w+(?:\s*,\s*(?:[A-Z]\w+/)?[A-Z]\w+)*)"
    )
    .expect("directive pattern is valid");

    /// A single check-name token, optionally department-qualified.
    static ref CHECK_NAME: Regex =
        Regex::new(r"(?:[A-Z]\w+/)?[A-Z]\w+").expect("check-name pattern is valid");
}

/// The verb of a directive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Disable,
    Enable,
    Todo,
    EndTodo,
}

impl Keyword {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "disable" => Some(Self::Disable),
            "enable" => Some(Self::Enable),
            "todo" => Some(Self::Todo),
            "end_todo" => Some(Self::EndTodo),
            _ => None,
        }
    }

    /// The open/close pair this keyword belongs to. At most one directive
    /// per group is honored within a single comment.
    pub fn group(self) -> DirectiveGroup {
        match self {
            Self::Disable | Self::Enable => DirectiveGroup::Disable,
            Self::Todo | Self::EndTodo => DirectiveGroup::Todo,
        }
    }

    /// Whether this keyword starts silencing its checks.
    pub fn opens(self) -> bool {
        matches!(self, Self::Disable | Self::Todo)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Enable => "enable",
            Self::Todo => "todo",
            Self::EndTodo => "end_todo",
        }
    }
}

/// The dedup group of a keyword: disable/enable vs. todo/end_todo.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveGroup {
    Disable,
    Todo,
}

/// One parsed suppression directive.
#[derive(Debug, Clone)]
pub struct Directive {
    keyword: Keyword,
    /// True when the directive names every known check via `all`.
    all_checks: bool,
    /// Qualified check names in list order. For an `all` directive this is
    /// the registry's full listing minus the unneeded-directive check.
    check_names: Vec<String>,
    /// File byte range of each listed token, parallel to `check_names`.
    /// Empty for an `all` directive.
    name_ranges: Vec<TextRange>,
    /// File byte range of the directive text (marker through check list),
    /// excluding any trailing description. Never spans multiple lines.
    range: TextRange,
    /// 1-based source line.
    line: usize,
    /// Trailing free text after the check list, if any.
    description: Option<String>,
}

impl Directive {
    pub fn keyword(&self) -> Keyword {
        self.keyword
    }

    pub fn all_checks(&self) -> bool {
        self.all_checks
    }

    pub fn check_names(&self) -> &[String] {
        &self.check_names
    }

    /// Each listed check name with the byte range of its raw token, in list
    /// order. Empty for `all` directives.
    pub fn named_ranges(&self) -> impl Iterator<Item = (&str, TextRange)> {
        self.check_names
            .iter()
            .map(String::as_str)
            .zip(self.name_ranges.iter().copied())
    }

    /// The byte range of one listed check name. `None` for `all` directives
    /// and for names the directive does not carry.
    pub fn name_range(&self, check_name: &str) -> Option<TextRange> {
        if self.all_checks {
            return None;
        }
        self.check_names
            .iter()
            .position(|name| name == check_name)
            .map(|index| self.name_ranges[index])
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Extract every honored directive from one comment.
///
/// `start` is the comment's byte offset in the file and `line` its 1-based
/// source line. Fragments are scanned left to right; a fragment whose group
/// was already seen in this comment is silently dropped, and text with no
/// recognizable marker or keyword yields nothing.
pub fn parse_comment(
    text: &str,
    start: TextSize,
    line: usize,
    registry: &CheckRegistry,
) -> Vec<Directive> {
    let captures: Vec<regex::Captures> = FRAGMENT.captures_iter(text).collect();
    let mut seen_groups: Vec<DirectiveGroup> = Vec::new();
    let mut directives = Vec::new();

    for (index, capture) in captures.iter().enumerate() {
        let Some(keyword) = Keyword::parse(&capture["keyword"]) else {
            continue;
        };
        let group = keyword.group();
        if seen_groups.contains(&group) {
            continue;
        }
        seen_groups.push(group);

        let fragment = capture.get(0).expect("match 0 always present");
        let checks = capture.name("checks").expect("checks group always present");

        let description_end = captures
            .get(index + 1)
            .map_or(text.len(), |next| next.get(0).expect("match 0").start());
        let description = text[fragment.end()..description_end].trim();

        let all_checks = checks.as_str() == "all";
        let (check_names, name_ranges) = if all_checks {
            (registry.all_except_unneeded(), Vec::new())
        } else {
            let mut names = Vec::new();
            let mut ranges = Vec::new();
            for token in CHECK_NAME.find_iter(checks.as_str()) {
                names.push(registry.qualify(token.as_str()));
                let token_start = checks.start() + token.start();
                ranges.push(TextRange::at(
                    start + TextSize::new(token_start as u32),
                    TextSize::of(token.as_str()),
                ));
            }
            (names, ranges)
        };

        directives.push(Directive {
            keyword,
            all_checks,
            check_names,
            name_ranges,
            range: TextRange::new(
                start + TextSize::new(fragment.start() as u32),
                start + TextSize::new(fragment.end() as u32),
            ),
            line,
            description: (!description.is_empty()).then(|| description.to_string()),
        });
    }

    directives
}
