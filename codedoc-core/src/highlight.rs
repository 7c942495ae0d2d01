//! Lightweight syntax highlighting for code samples.
//!
//! [`annotate`] splits a piece of source text into an ordered partition of
//! [`AnnotatedSpan`]s. Each span is either plain text or tagged with exactly
//! one [`LexicalCategory`]. The partition is computed in a single left-to-right
//! pass over the unmodified input, so text already claimed by one rule (a
//! string, a comment) is never re-tagged by another.
//!
//! Recognition rules, in priority order when several could start at the same
//! position:
//!
//! 1. keywords (`function`, `const`, `let`, ... `await`), word-delimited
//! 2. double-quoted strings
//! 3. single-quoted strings
//! 4. integer literals, word-delimited
//! 5. `//` line comments
//! 6. identifiers immediately followed by `(` (the `(` stays plain)
//!
//! The same rules apply regardless of the language label a code block carries.
//!
//! # Example
//!
//! ```
//! use codedoc_core::highlight::{annotate, LexicalCategory};
//!
//! let text = annotate("const x = 1");
//! assert_eq!(text.spans()[0].category, Some(LexicalCategory::Keyword));
//! assert_eq!(text.source(), "const x = 1");
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::html;

const KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "if", "else", "for", "while", "return", "import", "export",
    "from", "class", "extends", "async", "await",
];

/// One of the fixed highlighting tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LexicalCategory {
    Keyword,
    String,
    Number,
    Comment,
    FunctionName,
}

impl LexicalCategory {
    pub const ALL: [LexicalCategory; 5] = [
        LexicalCategory::Keyword,
        LexicalCategory::String,
        LexicalCategory::Number,
        LexicalCategory::Comment,
        LexicalCategory::FunctionName,
    ];

    /// Stable label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            LexicalCategory::Keyword => "keyword",
            LexicalCategory::String => "string",
            LexicalCategory::Number => "number",
            LexicalCategory::Comment => "comment",
            LexicalCategory::FunctionName => "function-name",
        }
    }

    /// CSS class the HTML renderer puts on spans of this category.
    pub fn css_class(self) -> &'static str {
        match self {
            LexicalCategory::Keyword => "syntax-keyword",
            LexicalCategory::String => "syntax-string",
            LexicalCategory::Number => "syntax-number",
            LexicalCategory::Comment => "syntax-comment",
            LexicalCategory::FunctionName => "syntax-function",
        }
    }
}

impl fmt::Display for LexicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run of the source text with zero or one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedSpan<'a> {
    pub text: &'a str,
    /// Byte offset of the span in the source.
    pub start: usize,
    /// Byte offset one past the end of the span.
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<LexicalCategory>,
}

impl AnnotatedSpan<'_> {
    pub fn is_plain(&self) -> bool {
        self.category.is_none()
    }
}

/// Ordered, gap-free, non-overlapping partition of a source string.
///
/// Spans are never empty and two plain spans are never adjacent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnnotatedText<'a> {
    spans: Vec<AnnotatedSpan<'a>>,
}

impl<'a> AnnotatedText<'a> {
    pub fn spans(&self) -> &[AnnotatedSpan<'a>] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatedSpan<'a>> {
        self.spans.iter()
    }

    /// Spans that carry a category.
    pub fn tokens(&self) -> impl Iterator<Item = &AnnotatedSpan<'a>> {
        self.spans.iter().filter(|span| !span.is_plain())
    }

    /// Concatenation of every span's text; always equal to the annotated input.
    pub fn source(&self) -> String {
        self.spans.iter().map(|span| span.text).collect()
    }

    /// Render as HTML: span text is escaped, categorized spans are wrapped in
    /// `<span class="syntax-...">`.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.spans.iter().map(|s| s.text.len()).sum::<usize>() * 2);
        for span in &self.spans {
            let text = html::escape(span.text);
            match span.category {
                Some(category) => {
                    out.push_str("<span class=\"");
                    out.push_str(category.css_class());
                    out.push_str("\">");
                    out.push_str(&text);
                    out.push_str("</span>");
                }
                None => out.push_str(&text),
            }
        }
        out
    }
}

impl<'t, 'a> IntoIterator for &'t AnnotatedText<'a> {
    type Item = &'t AnnotatedSpan<'a>;
    type IntoIter = std::slice::Iter<'t, AnnotatedSpan<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Alternation order is rule priority: at a given start position the
        // first alternative that matches wins.
        let pattern = format!(
            concat!(
                r"(?P<keyword>\b(?:{keywords})\b)",
                r#"|(?P<dstring>"[^"]*")"#,
                r"|(?P<sstring>'[^']*')",
                r"|(?P<number>\b[0-9]+\b)",
                r"|(?P<comment>//[^\r\n]*)",
                r"|\b(?P<function>[A-Za-z_][A-Za-z0-9_]*)\(",
            ),
            keywords = KEYWORDS.join("|"),
        );
        Regex::new(&pattern).expect("highlight token pattern is valid")
    })
}

/// Partition `source` into plain and categorized spans.
///
/// Total: any input, including the empty string, produces a result.
pub fn annotate(source: &str) -> AnnotatedText<'_> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in token_pattern().captures_iter(source) {
        let (category, range) = if let Some(m) = caps.name("keyword") {
            (LexicalCategory::Keyword, m.range())
        } else if let Some(m) = caps.name("dstring").or_else(|| caps.name("sstring")) {
            (LexicalCategory::String, m.range())
        } else if let Some(m) = caps.name("number") {
            (LexicalCategory::Number, m.range())
        } else if let Some(m) = caps.name("comment") {
            (LexicalCategory::Comment, m.range())
        } else if let Some(m) = caps.name("function") {
            (LexicalCategory::FunctionName, m.range())
        } else {
            continue;
        };

        if range.start > cursor {
            spans.push(AnnotatedSpan {
                text: &source[cursor..range.start],
                start: cursor,
                end: range.start,
                category: None,
            });
        }
        spans.push(AnnotatedSpan {
            text: &source[range.clone()],
            start: range.start,
            end: range.end,
            category: Some(category),
        });
        // For function names the trailing `(` is left for the next plain run.
        cursor = range.end;
    }

    if cursor < source.len() {
        spans.push(AnnotatedSpan {
            text: &source[cursor..],
            start: cursor,
            end: source.len(),
            category: None,
        });
    }

    AnnotatedText { spans }
}

/// Shorthand for `annotate(source).to_html()`.
pub fn highlight_html(source: &str) -> String {
    annotate(source).to_html()
}
