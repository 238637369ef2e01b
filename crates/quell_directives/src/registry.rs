//! Check-name registry: the set of known check identifiers, abbreviation
//! resolution, and near-miss suggestions for misspelled names.

use std::collections::BTreeSet;

/// The check that flags unnecessary disable directives. Disabling it is never
/// reported as unneeded, and `disable all` does not cover it.
pub const UNNEEDED_DIRECTIVE: &str = "Lint/UnneededDirective";

/// Similarity floor below which a name is not worth suggesting.
const MINIMUM_SIMILARITY_TO_SUGGEST: f64 = 0.9;

/// The registry of canonical check names.
#[derive(Debug, Clone)]
pub struct CheckRegistry {
    names: BTreeSet<String>,
}

impl CheckRegistry {
    /// Create a registry from an explicit name list.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a registry with all built-in checks registered.
    pub fn builtin() -> Self {
        Self::new([
            "Layout/IndentationWidth",
            "Layout/LineLength",
            "Layout/Tab",
            "Layout/TrailingWhitespace",
            "Lint/AmbiguousOperator",
            "Lint/Debugger",
            "Lint/DuplicateMethods",
            "Lint/ShadowedVariable",
            UNNEEDED_DIRECTIVE,
            "Metrics/AbcSize",
            "Metrics/ClassLength",
            "Metrics/MethodLength",
            "Metrics/ParameterCount",
            "Naming/ConstantName",
            "Naming/MethodName",
            "Style/ClassVars",
            "Style/GuardClause",
            "Style/StringLiterals",
        ])
    }

    /// Whether `name` is a known canonical check name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// All canonical names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Resolve a raw token to a canonical name.
    ///
    /// Qualified names (`Department/Name`) pass through verbatim, known or
    /// not. A bare name resolves when exactly one known check has it as its
    /// final segment; ambiguous or unmatched names pass through verbatim so
    /// that a directive for an unregistered check still parses.
    pub fn qualify(&self, raw: &str) -> String {
        if raw.contains('/') || self.contains(raw) {
            return raw.to_string();
        }

        let mut matches = self
            .names
            .iter()
            .filter(|name| name.split('/').next_back() == Some(raw));
        match (matches.next(), matches.next()) {
            (Some(name), None) => name.clone(),
            _ => raw.to_string(),
        }
    }

    /// Every known name except the unneeded-directive check itself: the list
    /// a `disable all` directive expands to.
    pub fn all_except_unneeded(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| *name != UNNEEDED_DIRECTIVE)
            .cloned()
            .collect()
    }

    /// The closest known name to `unknown`, if any is close enough to look
    /// like a misspelling.
    pub fn suggest(&self, unknown: &str) -> Option<&str> {
        self.names
            .iter()
            .map(|name| (name, similarity(name, unknown)))
            .filter(|(_, score)| *score >= MINIMUM_SIMILARITY_TO_SUGGEST)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(name, _)| name.as_str())
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Levenshtein-ratio similarity in `[0.0, 1.0]`.
fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Classic two-row Levenshtein distance over characters.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, &b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != b_char);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
