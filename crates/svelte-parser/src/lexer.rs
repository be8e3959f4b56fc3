//! CSS lexer for component style blocks, using logos.
//!
//! The lexer only needs to be precise enough to split a stylesheet into
//! rules, at-rules and declarations and to read selectors. Declaration
//! values are sliced from the source verbatim, so anything logos does not
//! recognise is surfaced as [`TokenKind::Delim`] rather than as an error.

use crate::span::Span;
use logos::Logos;
use text_size::TextSize;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token, relative to the lexed text.
    pub span: Span,
}

/// CSS token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
pub enum TokenKind {
    /// Whitespace (significant in selectors as the descendant combinator).
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// `/* ... */`
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    /// An identifier, possibly with escapes or a `--` prefix.
    #[regex(r"-{0,2}([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\f])([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])*")]
    Ident,

    /// `@media`, `@keyframes`, ...
    #[regex(r"@-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    AtKeyword,

    /// `#name`
    #[regex(r"#([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])+")]
    Hash,

    /// A quoted string.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    String,

    /// `50%`
    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)%")]
    Percentage,

    /// A number or dimension (`2`, `1.5em`, `2n`).
    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)[a-zA-Z]*")]
    Number,

    /// `.`
    #[token(".")]
    Dot,

    /// `:`
    #[token(":")]
    Colon,

    /// `::`
    #[token("::")]
    ColonColon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `>`
    #[token(">")]
    Gt,

    /// `+`
    #[token("+")]
    Plus,

    /// `~`
    #[token("~")]
    Tilde,

    /// `*`
    #[token("*")]
    Star,

    /// `&`
    #[token("&")]
    Amp,

    /// `|`
    #[token("|")]
    Pipe,

    /// Any other single character.
    Delim,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Ident => "identifier",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::Hash => "hash",
            TokenKind::String => "string",
            TokenKind::Percentage => "percentage",
            TokenKind::Number => "number",
            TokenKind::Dot => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::ColonColon => "'::'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Gt => "'>'",
            TokenKind::Plus => "'+'",
            TokenKind::Tilde => "'~'",
            TokenKind::Star => "'*'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Delim => "delimiter",
        }
    }

    /// Returns true for tokens that carry no syntax.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// A lexer over CSS text.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }

    /// Returns the text of the current token.
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = match self.inner.next()? {
            Ok(kind) => kind,
            Err(()) => TokenKind::Delim,
        };
        let span = self.inner.span();
        Some(Token {
            kind,
            span: Span::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
        })
    }
}
