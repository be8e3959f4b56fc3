//! Style-block CSS AST and parser.
//!
//! Component `<style>` contents are parsed into a small tree of rules,
//! at-rules and declarations. Selectors are parsed into complex selectors of
//! simple components so that analyses can tell a class selector from a
//! pseudo-class wrapping one (`:global(.foo)`).

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::Span;
use smol_str::SmolStr;
use text_size::TextSize;

/// A parsed component stylesheet.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// The span of the stylesheet content.
    pub span: Span,
    /// Top-level rules and at-rules.
    pub children: Vec<CssNode>,
}

/// An item inside a stylesheet or a block.
#[derive(Debug, Clone)]
pub enum CssNode {
    /// A style rule.
    Rule(CssRule),
    /// An at-rule.
    Atrule(CssAtrule),
    /// A declaration.
    Declaration(Declaration),
}

/// A style rule: a selector list and a block.
#[derive(Debug, Clone)]
pub struct CssRule {
    /// The span of the rule.
    pub span: Span,
    /// The rule's selector list.
    pub prelude: SelectorList,
    /// The rule's block.
    pub block: CssBlock,
}

/// An at-rule such as `@media (...) { ... }` or `@import "x";`.
#[derive(Debug, Clone)]
pub struct CssAtrule {
    /// The span of the at-rule.
    pub span: Span,
    /// The name without `@`.
    pub name: SmolStr,
    /// The raw prelude, trimmed.
    pub prelude: String,
    /// The block, if the at-rule has one.
    pub block: Option<CssBlock>,
}

/// A `{ ... }` block.
#[derive(Debug, Clone, Default)]
pub struct CssBlock {
    /// The span of the block including braces.
    pub span: Span,
    /// The block items.
    pub children: Vec<CssNode>,
}

/// A `property: value` declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// The span of the declaration.
    pub span: Span,
    /// The property name.
    pub property: SmolStr,
    /// The raw value, trimmed.
    pub value: String,
}

/// A comma-separated list of complex selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    /// The span of the list.
    pub span: Span,
    /// The selectors.
    pub children: Vec<ComplexSelector>,
}

/// A selector made of simple selectors and combinators, e.g. `div > .a:hover`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The span of the selector.
    pub span: Span,
    /// Components in source order.
    pub children: Vec<SimpleSelector>,
}

/// One component of a complex selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `div`
    Type(SmolStr),
    /// `*`
    Universal,
    /// `.name` (name as written, escapes included)
    Class(SmolStr),
    /// `#name`
    Id(SmolStr),
    /// `[attr=value]` (raw inner text)
    Attribute(String),
    /// `:name` or `:name(args)`
    PseudoClass(PseudoClassSelector),
    /// `::name` or `::name(args)`
    PseudoElement(SmolStr),
    /// `&`
    Nesting,
    /// `50%` in keyframes
    Percentage(SmolStr),
    /// A combinator between compound selectors.
    Combinator(Combinator),
}

/// A pseudo-class selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoClassSelector {
    /// The name without `:`.
    pub name: SmolStr,
    /// The raw argument text, for functional pseudo-classes.
    pub args: Option<String>,
    /// The argument parsed as a selector list, when it is one.
    pub selectors: Option<SelectorList>,
}

/// A selector combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace.
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

/// Parses CSS text. `base` is the offset of `source` in the document and is
/// added to every span, including error spans.
pub fn parse_stylesheet(source: &str, base: TextSize) -> (StyleSheet, Vec<ParseError>) {
    let mut parser = CssParser::new(source, base);
    let children = parser.parse_items(false);
    let sheet = StyleSheet {
        span: Span::from_offsets(0, source.len()).shifted(base),
        children,
    };
    (sheet, parser.errors)
}

struct CssParser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    base: TextSize,
    errors: Vec<ParseError>,
}

impl<'src> CssParser<'src> {
    fn new(source: &'src str, base: TextSize) -> Self {
        let tokens = Lexer::new(source)
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        Self {
            source,
            tokens,
            pos: 0,
            base,
            errors: Vec::new(),
        }
    }

    // === Token helpers ===

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    fn offset(&self) -> usize {
        self.current()
            .map(|t| u32::from(t.span.start) as usize)
            .unwrap_or(self.source.len())
    }

    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| u32::from(t.span.end) as usize)
            .unwrap_or(0)
    }

    fn skip_whitespace(&mut self) {
        while self.check(TokenKind::Whitespace) {
            self.pos += 1;
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::from_offsets(start, end).shifted(self.base)
    }

    fn error(&mut self, message: impl Into<String>, start: usize, end: usize) {
        let span = self.span(start, end);
        self.errors.push(ParseError::new(
            ParseErrorKind::InvalidCss {
                message: message.into(),
            },
            span,
        ));
    }

    /// Finds the first `{`, `;` or `}` at nesting depth zero from the current
    /// position, skipping over parentheses and brackets.
    fn find_terminator(&self) -> Option<(usize, TokenKind)> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(self.pos) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::RBrace if depth == 0 => {
                    return Some((i, token.kind));
                }
                _ => {}
            }
        }
        None
    }

    // === Items ===

    /// Parses items until end of input or, inside a block, a closing `}`.
    fn parse_items(&mut self, in_block: bool) -> Vec<CssNode> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(token) = self.current().copied() else {
                break;
            };
            match token.kind {
                TokenKind::RBrace if in_block => break,
                TokenKind::RBrace => {
                    let start = self.offset();
                    self.error("unexpected '}'", start, start + 1);
                    self.pos += 1;
                }
                TokenKind::Semicolon => self.pos += 1,
                TokenKind::AtKeyword => items.push(CssNode::Atrule(self.parse_atrule())),
                _ => match self.find_terminator() {
                    Some((brace, TokenKind::LBrace)) => {
                        items.push(CssNode::Rule(self.parse_rule(brace)))
                    }
                    Some((end, _)) => {
                        if let Some(decl) = self.parse_declaration(end) {
                            items.push(CssNode::Declaration(decl));
                        }
                    }
                    None => {
                        let start = self.offset();
                        self.error("expected '{' or ';'", start, self.source.len());
                        self.pos = self.tokens.len();
                    }
                },
            }
        }
        items
    }

    /// Parses a rule whose block opens at token index `brace`.
    fn parse_rule(&mut self, brace: usize) -> CssRule {
        let start = self.offset();
        let prelude_start = self.pos;
        self.pos = brace;
        let prelude = match parse_selector_tokens(self.source, &self.tokens[prelude_start..brace]) {
            Ok(list) => list.shifted(self.base),
            Err((message, at)) => {
                let end = self.prev_end();
                self.error(message, at, end);
                SelectorList::default()
            }
        };
        let block = self.parse_block();
        CssRule {
            span: self.span(start, self.prev_end()),
            prelude,
            block,
        }
    }

    fn parse_atrule(&mut self) -> CssAtrule {
        let start = self.offset();
        let name = self.current().map(|t| t.span.slice(self.source)).unwrap_or("@");
        let name = SmolStr::new(name.trim_start_matches('@'));
        self.pos += 1;

        let prelude_start = self.offset();
        let (prelude_end, block) = match self.find_terminator() {
            Some((i, TokenKind::LBrace)) => {
                self.pos = i;
                let prelude_end = self.offset();
                (prelude_end, Some(self.parse_block()))
            }
            Some((i, TokenKind::Semicolon)) => {
                self.pos = i;
                let prelude_end = self.offset();
                self.pos += 1;
                (prelude_end, None)
            }
            Some((i, _)) => {
                // `}` of the enclosing block ends a statement at-rule too.
                self.pos = i;
                (self.offset(), None)
            }
            None => {
                self.pos = self.tokens.len();
                (self.source.len(), None)
            }
        };

        CssAtrule {
            span: self.span(start, self.prev_end().max(prelude_end)),
            name,
            prelude: self.source[prelude_start..prelude_end].trim().to_string(),
            block,
        }
    }

    /// Parses `{ items }` starting at the `{` token.
    fn parse_block(&mut self) -> CssBlock {
        let start = self.offset();
        self.pos += 1;
        let children = self.parse_items(true);
        if self.check(TokenKind::RBrace) {
            self.pos += 1;
        } else {
            let end = self.source.len();
            self.error("unclosed block", start, end);
        }
        CssBlock {
            span: self.span(start, self.prev_end()),
            children,
        }
    }

    /// Parses a declaration ending at token index `end` (a `;` or `}`).
    fn parse_declaration(&mut self, end: usize) -> Option<Declaration> {
        let start = self.offset();
        let end_offset = self
            .tokens
            .get(end)
            .map(|t| u32::from(t.span.start) as usize)
            .unwrap_or(self.source.len());
        let text = &self.source[start..end_offset];
        let end_kind = self.tokens.get(end).map(|t| t.kind);

        self.pos = end;
        if end_kind == Some(TokenKind::Semicolon) {
            self.pos += 1;
        }

        let Some((property, value)) = text.split_once(':') else {
            self.error("expected ':' in declaration", start, end_offset);
            return None;
        };
        let property = property.trim();
        if property.is_empty() {
            self.error("missing property name", start, end_offset);
            return None;
        }

        Some(Declaration {
            span: self.span(start, start + text.trim_end().len()),
            property: SmolStr::new(property),
            value: value.trim().to_string(),
        })
    }
}

impl SelectorList {
    fn shifted(mut self, base: TextSize) -> Self {
        self.span = self.span.shifted(base);
        for selector in &mut self.children {
            selector.span = selector.span.shifted(base);
            for component in &mut selector.children {
                if let SimpleSelector::PseudoClass(PseudoClassSelector {
                    selectors: Some(inner),
                    ..
                }) = component
                {
                    *inner = std::mem::take(inner).shifted(base);
                }
            }
        }
        self
    }
}

/// Parses a selector list from CSS text, e.g. a pseudo-class argument.
pub fn parse_selector_list(source: &str) -> Option<SelectorList> {
    let tokens: Vec<Token> = Lexer::new(source)
        .filter(|t| t.kind != TokenKind::Comment)
        .collect();
    parse_selector_tokens(source, &tokens).ok()
}

/// Parses selector tokens. On failure returns a message and the offending
/// source offset.
fn parse_selector_tokens(
    source: &str,
    tokens: &[Token],
) -> Result<SelectorList, (String, usize)> {
    let mut children = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket => depth += 1,
            TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                children.push(parse_complex(source, &tokens[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    children.push(parse_complex(source, &tokens[start..])?);

    let span = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
        _ => Span::default(),
    };
    Ok(SelectorList { span, children })
}

fn parse_complex(source: &str, tokens: &[Token]) -> Result<ComplexSelector, (String, usize)> {
    let text = |t: &Token| t.span.slice(source);
    let trimmed: Vec<&Token> = {
        let first = tokens.iter().position(|t| t.kind != TokenKind::Whitespace);
        let last = tokens.iter().rposition(|t| t.kind != TokenKind::Whitespace);
        match (first, last) {
            (Some(first), Some(last)) => tokens[first..=last].iter().collect(),
            _ => {
                let at = tokens
                    .first()
                    .map(|t| u32::from(t.span.start) as usize)
                    .unwrap_or(0);
                return Err(("empty selector".to_string(), at));
            }
        }
    };

    let mut children = Vec::new();
    let mut pending_descendant = false;
    let mut i = 0;
    while i < trimmed.len() {
        let token = trimmed[i];
        let at = u32::from(token.span.start) as usize;
        let combinator = match token.kind {
            TokenKind::Whitespace => {
                pending_descendant = true;
                i += 1;
                continue;
            }
            TokenKind::Gt => Some(Combinator::Child),
            TokenKind::Plus => Some(Combinator::NextSibling),
            TokenKind::Tilde => Some(Combinator::SubsequentSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            children.push(SimpleSelector::Combinator(combinator));
            pending_descendant = false;
            i += 1;
            continue;
        }
        if pending_descendant && !matches!(children.last(), Some(SimpleSelector::Combinator(_))) {
            children.push(SimpleSelector::Combinator(Combinator::Descendant));
        }
        pending_descendant = false;

        let next = trimmed.get(i + 1).copied();
        let adjacent = |next: Option<&Token>, kind: TokenKind| {
            next.is_some_and(|n| n.kind == kind && n.span.start == token.span.end)
        };
        match token.kind {
            TokenKind::Ident if adjacent(next, TokenKind::Pipe) => {
                // Namespace prefix (`svg|a`): the type after the bar is what matters.
                i += 2;
                continue;
            }
            TokenKind::Ident => {
                children.push(SimpleSelector::Type(SmolStr::new(text(token))));
                i += 1;
            }
            TokenKind::Star => {
                children.push(SimpleSelector::Universal);
                i += 1;
            }
            TokenKind::Amp => {
                children.push(SimpleSelector::Nesting);
                i += 1;
            }
            TokenKind::Percentage => {
                children.push(SimpleSelector::Percentage(SmolStr::new(text(token))));
                i += 1;
            }
            TokenKind::Hash => {
                children.push(SimpleSelector::Id(SmolStr::new(&text(token)[1..])));
                i += 1;
            }
            TokenKind::Dot if adjacent(next, TokenKind::Ident) => {
                let name = next.map(text).unwrap_or_default();
                children.push(SimpleSelector::Class(SmolStr::new(name)));
                i += 2;
            }
            TokenKind::LBracket => {
                let close = find_close(&trimmed, i, TokenKind::LBracket, TokenKind::RBracket)
                    .ok_or_else(|| ("unclosed attribute selector".to_string(), at))?;
                let inner_start = u32::from(token.span.end) as usize;
                let inner_end = u32::from(trimmed[close].span.start) as usize;
                children.push(SimpleSelector::Attribute(
                    source[inner_start..inner_end].trim().to_string(),
                ));
                i = close + 1;
            }
            TokenKind::Colon | TokenKind::ColonColon if adjacent(next, TokenKind::Ident) => {
                let name = SmolStr::new(next.map(text).unwrap_or_default());
                let mut args = None;
                i += 2;
                if let Some(paren) = trimmed.get(i).copied() {
                    let name_end = trimmed[i - 1].span.end;
                    if paren.kind == TokenKind::LParen && paren.span.start == name_end {
                        let close =
                            find_close(&trimmed, i, TokenKind::LParen, TokenKind::RParen)
                                .ok_or_else(|| ("unclosed parenthesis".to_string(), at))?;
                        let inner_start = u32::from(paren.span.end) as usize;
                        let inner_end = u32::from(trimmed[close].span.start) as usize;
                        args = Some((inner_start, &source[inner_start..inner_end]));
                        i = close + 1;
                    }
                }
                if token.kind == TokenKind::ColonColon {
                    children.push(SimpleSelector::PseudoElement(name));
                } else {
                    let selectors = args.and_then(|(offset, args)| {
                        parse_selector_list(args)
                            .map(|list| list.shifted(TextSize::from(offset as u32)))
                    });
                    children.push(SimpleSelector::PseudoClass(PseudoClassSelector {
                        name,
                        args: args.map(|(_, a)| a.trim().to_string()),
                        selectors,
                    }));
                }
            }
            _ => {
                return Err((
                    format!("unexpected {} in selector", token.kind.name()),
                    at,
                ));
            }
        }
    }

    let first = trimmed[0];
    let last = trimmed[trimmed.len() - 1];
    Ok(ComplexSelector {
        span: Span::new(first.span.start, last.span.end),
        children,
    })
}

/// Finds the index of the token closing the bracket opened at `open_index`.
fn find_close(tokens: &[&Token], open_index: usize, open: TokenKind, close: TokenKind) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open_index) {
        if token.kind == open {
            depth += 1;
        } else if token.kind == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
