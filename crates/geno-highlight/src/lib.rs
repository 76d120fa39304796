//! `geno-highlight` - Regex-based glyph classification for `geno-core`.
//!
//! A [`RegexClassifier`] runs an ordered list of [`RegexRule`]s over each line and assigns
//! the rule's [`GlyphKind`] to every character it matches. Later rules win, so literals and
//! comments are listed after keywords and numbers.
//!
//! Classification is strictly per line: a block comment is only recognized when it opens
//! and closes on the same line.

use geno_core::{GlyphClassifier, GlyphKind};
use regex::Regex;

/// A single regex classification rule.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    kind: GlyphKind,
    capture_group: Option<usize>,
}

impl RegexRule {
    /// Build a rule that marks every match of `pattern` as `kind`.
    pub fn new(pattern: &str, kind: GlyphKind) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            kind,
            capture_group: None,
        })
    }

    /// Mark only a capture group of each match.
    ///
    /// Example (preprocessor directive name):
    /// - pattern: `^\s*#\s*(\w+)`
    /// - capture_group: `1`
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    /// The kind assigned to matches.
    pub fn kind(&self) -> GlyphKind {
        self.kind
    }

    fn for_each_match(&self, line: &str, mut f: impl FnMut(usize, usize)) {
        match self.capture_group {
            Some(group) => {
                for caps in self.regex.captures_iter(line) {
                    if let Some(m) = caps.get(group) {
                        f(m.start(), m.end());
                    }
                }
            }
            None => {
                for m in self.regex.find_iter(line) {
                    f(m.start(), m.end());
                }
            }
        }
    }
}

/// A regex-rule [`GlyphClassifier`].
#[derive(Debug, Clone)]
pub struct RegexClassifier {
    rules: Vec<RegexRule>,
}

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "auto", "bool", "break", "case", "catch", "char", "class", "const",
    "constexpr", "const_cast", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "extern", "false", "float", "for", "friend",
    "goto", "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept",
    "nullptr", "operator", "override", "private", "protected", "public", "return", "short",
    "signed", "sizeof", "static", "static_assert", "static_cast", "struct", "switch",
    "template", "this", "throw", "true", "try", "typedef", "typename", "union", "unsigned",
    "using", "virtual", "void", "volatile", "while",
];

impl RegexClassifier {
    /// Create a classifier from rules, applied in order.
    pub fn new(rules: Vec<RegexRule>) -> Self {
        Self { rules }
    }

    /// The rules, in application order.
    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    /// A small C++ grammar: keywords, preprocessor directives, numbers, string and character
    /// literals, line comments and single-line block comments.
    pub fn cpp_default() -> Result<Self, regex::Error> {
        let keywords = format!(r"\b(?:{})\b", CPP_KEYWORDS.join("|"));
        Ok(Self::new(vec![
            RegexRule::new(&keywords, GlyphKind::Keyword)?,
            RegexRule::new(r"^\s*(#\s*\w+)", GlyphKind::Keyword)?.with_capture_group(1),
            RegexRule::new(
                r"\b(?:0[xX][0-9a-fA-F']+|\d[\d']*(?:\.\d+)?(?:[eE][+-]?\d+)?)[uUlLfF]*\b",
                GlyphKind::Number,
            )?,
            RegexRule::new(r#""(?:\\.|[^"\\])*""#, GlyphKind::String)?,
            RegexRule::new(r"'(?:\\.|[^'\\])'", GlyphKind::String)?,
            RegexRule::new(r"/\*.*?\*/", GlyphKind::Comment)?,
            RegexRule::new(r"//.*$", GlyphKind::Comment)?,
        ]))
    }
}

impl GlyphClassifier for RegexClassifier {
    fn classify_line(&self, text: &str) -> Vec<GlyphKind> {
        let byte_to_char: Vec<usize> = {
            let mut map = vec![0; text.len() + 1];
            let mut count = 0;
            for (byte, ch) in text.char_indices() {
                map[byte..byte + ch.len_utf8()].fill(count);
                count += 1;
            }
            map[text.len()] = count;
            map
        };

        let mut kinds = vec![GlyphKind::Default; byte_to_char[text.len()]];
        for rule in &self.rules {
            rule.for_each_match(text, |start, end| {
                kinds[byte_to_char[start]..byte_to_char[end]].fill(rule.kind);
            });
        }
        kinds
    }
}
