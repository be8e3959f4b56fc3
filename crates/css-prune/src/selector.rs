//! Selector tokenizer.
//!
//! Turns the text of a selector list into the class-token lookup keys used
//! against the usage index. A `logos` lexer classifies the selector into
//! spans; a small state machine concatenates a class token with the spans
//! touching it into one key, unless the span is a known pseudo-class.

use logos::Logos;
use smol_str::SmolStr;
use std::borrow::Cow;

/// Pseudo-class names recognised as pseudo tokens.
pub const PSEUDO_CLASSES: &[&str] = &[
    "active",
    "any-link",
    "blank",
    "checked",
    "current",
    "default",
    "defined",
    "dir",
    "disabled",
    "drop",
    "empty",
    "enabled",
    "first",
    "first-child",
    "first-of-type",
    "fullscreen",
    "future",
    "focus",
    "focus-visible",
    "focus-within",
    "has",
    "host",
    "host-context",
    "hover",
    "indeterminate",
    "in-range",
    "invalid",
    "is",
    "lang",
    "last-child",
    "last-of-type",
    "left",
    "link",
    "local-link",
    "not",
    "nth-child",
    "nth-col",
    "nth-last-child",
    "nth-last-col",
    "nth-last-of-type",
    "nth-of-type",
    "only-child",
    "only-of-type",
    "optional",
    "out-of-range",
    "past",
    "placeholder-shown",
    "read-only",
    "read-write",
    "required",
    "right",
    "root",
    "scope",
    "state",
    "target",
    "target-within",
    "user-invalid",
    "valid",
    "visited",
    "where",
];

/// Returns true if `name` (without the colon) is a known pseudo-class.
pub fn is_pseudo_class(name: &str) -> bool {
    PSEUDO_CLASSES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    #[regex(r"\.([0-9a-zA-Z_-]|[^\x00-\x7F]|\\[0-9a-fA-F]{1,6}[ \t]?|\\[^\r\n\f0-9a-fA-F])+")]
    Class,

    #[regex(r"::-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    PseudoElement,

    #[regex(r":-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Pseudo,

    #[regex(r#"\[([^\]"']|"([^"\\]|\\.)*"|'([^'\\]|\\.)*')*\]"#)]
    Attribute,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    String,

    #[token("(")]
    #[token(")")]
    Paren,

    #[regex(r"[0-9]+\.[0-9]+%?")]
    Number,

    #[regex(r"([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])+")]
    Name,

    #[regex(r"#([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])+")]
    Hash,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    Other,
}

/// Classification of a span of selector text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorTokenKind {
    /// `.name`
    Class,
    /// `:name` where `name` is in [`PSEUDO_CLASSES`].
    PseudoClass,
    /// `::name`
    PseudoElement,
    /// `:name` for any other name.
    UnknownPseudo,
    /// `[...]`, quotes included.
    Attribute,
    /// A quoted string outside an attribute selector.
    String,
    /// `(` or `)`
    Paren,
    /// Type names, ids, numbers, combinators, commas and whitespace.
    Other,
}

/// A classified span of selector text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorToken<'a> {
    /// The kind of span.
    pub kind: SelectorTokenKind,
    /// The span's text.
    pub text: &'a str,
}

/// Classifies every span of `selector`.
pub fn scan(selector: &str) -> Vec<SelectorToken<'_>> {
    Spans::new(selector).collect()
}

/// Iterator over the classified spans of a selector.
struct Spans<'a> {
    lexer: logos::Lexer<'a, Lexeme>,
}

impl<'a> Spans<'a> {
    fn new(selector: &'a str) -> Self {
        Self {
            lexer: Lexeme::lexer(selector),
        }
    }
}

impl<'a> Iterator for Spans<'a> {
    type Item = SelectorToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let lexeme = self.lexer.next()?;
        let text = self.lexer.slice();
        let kind = match lexeme.unwrap_or(Lexeme::Other) {
            Lexeme::Class => SelectorTokenKind::Class,
            Lexeme::PseudoElement => SelectorTokenKind::PseudoElement,
            Lexeme::Pseudo if is_pseudo_class(&text[1..]) => SelectorTokenKind::PseudoClass,
            Lexeme::Pseudo if is_legacy_pseudo_element(&text[1..]) => {
                SelectorTokenKind::PseudoElement
            }
            Lexeme::Pseudo => SelectorTokenKind::UnknownPseudo,
            Lexeme::Attribute => SelectorTokenKind::Attribute,
            Lexeme::String => SelectorTokenKind::String,
            Lexeme::Paren => SelectorTokenKind::Paren,
            Lexeme::Number
            | Lexeme::Name
            | Lexeme::Hash
            | Lexeme::Whitespace
            | Lexeme::Other => SelectorTokenKind::Other,
        };
        Some(SelectorToken { kind, text })
    }
}

/// Pseudo-elements that may be written with a single colon.
fn is_legacy_pseudo_element(name: &str) -> bool {
    ["before", "after", "first-line", "first-letter"]
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}

/// Returns the class-token lookup keys of `selector`, in order.
///
/// A key starts at a class token and absorbs the spans touching it: further
/// class tokens (`.foo.bar`) and pseudos outside [`PSEUDO_CLASSES`]
/// (`.foo:global`). A known pseudo-class, a pseudo-element or any other span
/// ends the key, so `.foo:hover` yields `.foo`. Escapes are resolved.
pub fn class_tokens(selector: &str) -> ClassTokens<'_> {
    ClassTokens {
        spans: Spans::new(selector),
        pending: None,
    }
}

/// Iterator returned by [`class_tokens`].
pub struct ClassTokens<'a> {
    spans: Spans<'a>,
    pending: Option<String>,
}

impl Iterator for ClassTokens<'_> {
    type Item = SmolStr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(span) = self.spans.next() else {
                return self.pending.take().map(SmolStr::from);
            };
            match span.kind {
                SelectorTokenKind::Class => {
                    self.pending
                        .get_or_insert_with(String::new)
                        .push_str(&unescape(span.text));
                }
                SelectorTokenKind::UnknownPseudo if self.pending.is_some() => {
                    if let Some(pending) = &mut self.pending {
                        pending.push_str(span.text);
                    }
                }
                _ => {
                    if let Some(key) = self.pending.take() {
                        return Some(SmolStr::from(key));
                    }
                }
            }
        }
    }
}

/// Resolves CSS escapes: `\:` becomes `:`, `\31 ` becomes `1`.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(h) if h.is_ascii_hexdigit() => {
                    hex.push(*h);
                    chars.next();
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }

        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .filter(|c| *c != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        out.push(decoded);
        if chars.peek().is_some_and(|c| *c == ' ' || *c == '\t') {
            chars.next();
        }
    }
    Cow::Owned(out)
}
