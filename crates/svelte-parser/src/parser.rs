//! Recursive descent parser for Svelte component templates.
//!
//! The parser works directly on source bytes. Every delimiter it looks for is
//! ASCII, so every offset it slices at is a character boundary.

use crate::ast::*;
use crate::css;
use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;
use crate::{ParseOptions, ParseResult};
use smol_str::SmolStr;

/// HTML void elements that are self-closing and should not have closing tags.
/// See: https://developer.mozilla.org/en-US/docs/Glossary/Void_element
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text rather than template markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Returns true if the given element name is an HTML void element.
fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_lowercase().as_str())
}

fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| raw.eq_ignore_ascii_case(name))
}

/// Where a fragment is being parsed; decides which tags end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Root,
    Element,
    Block,
}

/// The Svelte parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// The source as bytes.
    bytes: &'src [u8],
    /// Current byte offset.
    pos: usize,
    /// Parse errors collected during parsing.
    errors: Vec<ParseError>,
    /// Parser options.
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            errors: Vec::new(),
            options,
        }
    }

    /// Parses the source into a Svelte document.
    pub fn parse(mut self) -> ParseResult {
        let document = self.parse_document();
        ParseResult {
            document,
            errors: self.errors,
        }
    }

    // === Cursor helpers ===

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos.min(self.bytes.len())..].starts_with(s.as_bytes())
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Advances past the current character.
    fn bump_char(&mut self) {
        let len = self.source[self.pos..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        self.pos += len;
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::from_offsets(start, end)
    }

    fn error(&mut self, kind: ParseErrorKind, start: usize, end: usize) {
        self.errors.push(ParseError::new(kind, self.span(start, end)));
    }

    /// Returns true if a `<` at `at` opens a tag or comment.
    fn is_tag_start(&self, at: usize) -> bool {
        match self.bytes.get(at + 1) {
            Some(b) if b.is_ascii_alphabetic() || *b == b'/' => true,
            Some(b'!') => self.bytes[at..].starts_with(b"<!--"),
            _ => false,
        }
    }

    /// Finds `needle` (ASCII, case-insensitive) at or after `from`.
    fn find_ascii_ci(&self, from: usize, needle: &str) -> Option<usize> {
        let needle = needle.as_bytes();
        self.bytes
            .get(from..)?
            .windows(needle.len())
            .position(|window| window.eq_ignore_ascii_case(needle))
            .map(|p| from + p)
    }

    // === Expressions ===

    /// Finds the `}` that closes an expression starting at `from`.
    ///
    /// Braces inside strings, template literals and comments are ignored.
    fn scan_expression_end(&self, from: usize) -> Option<usize> {
        let bytes = self.bytes;
        let mut depth = 0usize;
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    if depth == 0 {
                        return Some(i);
                    }
                    depth -= 1;
                }
                quote @ (b'"' | b'\'') => i = self.skip_string(i, quote)?,
                b'`' => i = self.skip_template_literal(i)?,
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    i += bytes[i..].iter().position(|&b| b == b'\n')?;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i += 2 + bytes[i + 2..].windows(2).position(|w| w == b"*/")? + 1;
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Returns the offset of the quote closing the string opened at `start`.
    fn skip_string(&self, start: usize, quote: u8) -> Option<usize> {
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b if b == quote => return Some(i),
                _ => i += 1,
            }
        }
        None
    }

    /// Returns the offset of the backtick closing the template literal opened
    /// at `start`, skipping `${...}` substitutions.
    fn skip_template_literal(&self, start: usize) -> Option<usize> {
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'`' => return Some(i),
                b'$' if self.bytes.get(i + 1) == Some(&b'{') => {
                    i = self.scan_expression_end(i + 2)? + 1;
                }
                _ => i += 1,
            }
        }
        None
    }

    /// Reads a `{...}` starting at the current `{` and returns the byte range
    /// of its content. On a missing `}` the rest of the source is taken.
    fn read_braced(&mut self) -> (usize, usize) {
        let start = self.pos;
        let inner_start = start + 1;
        match self.scan_expression_end(inner_start) {
            Some(close) => {
                self.pos = close + 1;
                (inner_start, close)
            }
            None => {
                let end = self.bytes.len();
                self.error(
                    ParseErrorKind::UnexpectedEof {
                        expected: "'}'".to_string(),
                    },
                    start,
                    end,
                );
                self.pos = end;
                (inner_start.min(end), end)
            }
        }
    }

    // === Document ===

    fn parse_document(&mut self) -> SvelteDocument {
        let fragment = self.parse_fragment(Context::Root);
        let mut document = SvelteDocument {
            span: self.span(0, self.bytes.len()),
            ..Default::default()
        };

        let mut nodes = Vec::with_capacity(fragment.nodes.len());
        for node in fragment.nodes {
            match node {
                TemplateNode::Element(element) if element.name == "script" => {
                    let script = self.lift_script(element);
                    let slot = match script.context {
                        ScriptContext::Module => &mut document.module_script,
                        ScriptContext::Default => &mut document.instance_script,
                    };
                    if slot.is_none() {
                        *slot = Some(script);
                    }
                }
                TemplateNode::Element(element) if element.name == "style" => {
                    if document.style.is_some() {
                        self.error(
                            ParseErrorKind::DuplicateStyle,
                            u32::from(element.span.start) as usize,
                            u32::from(element.span.end) as usize,
                        );
                    } else {
                        document.style = Some(self.lift_style(element));
                    }
                }
                other => nodes.push(other),
            }
        }
        document.fragment = Fragment {
            nodes,
            span: fragment.span,
        };
        document
    }

    fn lift_script(&self, element: Element) -> Script {
        let (content, content_span) = raw_content(&element);
        let context = if attribute_text(&element.attributes, "context") == Some("module")
            || attribute_text(&element.attributes, "module").is_some()
        {
            ScriptContext::Module
        } else {
            ScriptContext::Default
        };
        let lang = match attribute_text(&element.attributes, "lang") {
            Some("ts" | "typescript") => ScriptLang::TypeScript,
            _ => ScriptLang::JavaScript,
        };
        Script {
            span: element.span,
            content_span,
            content,
            lang,
            context,
        }
    }

    fn lift_style(&mut self, element: Element) -> Style {
        let (content, content_span) = raw_content(&element);
        let stylesheet = if self.options.parse_style {
            let (stylesheet, errors) = css::parse_stylesheet(&content, content_span.start);
            self.errors.extend(errors);
            stylesheet
        } else {
            css::StyleSheet {
                span: content_span,
                children: Vec::new(),
            }
        };
        Style {
            span: element.span,
            content_span,
            content,
            global: attribute_text(&element.attributes, "global").is_some(),
            attributes: element.attributes,
            stylesheet,
        }
    }

    // === Template ===

    fn parse_fragment(&mut self, context: Context) -> Fragment {
        let start = self.pos;
        let mut nodes = Vec::new();

        while !self.at_end() {
            if self.starts_with("<!--") {
                nodes.push(self.parse_comment());
            } else if self.starts_with("</") {
                if context != Context::Root {
                    break;
                }
                let tag_start = self.pos;
                let tag_name = self.parse_closing_tag();
                self.error(
                    ParseErrorKind::UnexpectedClosingTag { tag_name },
                    tag_start,
                    self.pos,
                );
            } else if self.peek() == Some(b'<') && self.is_tag_start(self.pos) {
                nodes.push(self.parse_element());
            } else if self.starts_with("{:") || self.starts_with("{/") {
                if context != Context::Root {
                    break;
                }
                let tag_start = self.pos;
                let (inner_start, inner_end) = self.read_braced();
                let tag = self.source[inner_start..inner_end].to_string();
                self.error(ParseErrorKind::UnexpectedBlockTag { tag }, tag_start, self.pos);
            } else if self.starts_with("{#") {
                nodes.push(self.parse_block());
            } else if self.starts_with("{@") {
                nodes.push(self.parse_special_tag());
            } else if self.peek() == Some(b'{') {
                nodes.push(self.parse_expression_tag());
            } else {
                nodes.push(self.parse_text());
            }
        }

        Fragment {
            nodes,
            span: self.span(start, self.pos),
        }
    }

    fn parse_text(&mut self) -> TemplateNode {
        let start = self.pos;
        let mut end = start + 1;
        while end < self.bytes.len() {
            match self.bytes[end] {
                b'{' => break,
                b'<' if self.is_tag_start(end) => break,
                _ => end += 1,
            }
        }
        self.pos = end;
        TemplateNode::Text(Text {
            span: self.span(start, end),
            data: self.source[start..end].to_string(),
        })
    }

    fn parse_comment(&mut self) -> TemplateNode {
        let start = self.pos;
        self.pos += 4;
        let data_start = self.pos;
        let data_end = match self.bytes[data_start..]
            .windows(3)
            .position(|w| w == b"-->")
        {
            Some(p) => {
                self.pos = data_start + p + 3;
                data_start + p
            }
            None => {
                let end = self.bytes.len();
                self.error(
                    ParseErrorKind::UnexpectedEof {
                        expected: "'-->'".to_string(),
                    },
                    start,
                    end,
                );
                self.pos = end;
                end
            }
        };
        TemplateNode::Comment(Comment {
            span: self.span(start, self.pos),
            data: self.source[data_start..data_end].to_string(),
        })
    }

    fn parse_expression_tag(&mut self) -> TemplateNode {
        let start = self.pos;
        let (inner_start, inner_end) = self.read_braced();
        TemplateNode::Expression(ExpressionTag {
            span: self.span(start, self.pos),
            expression: self.source[inner_start..inner_end].trim().to_string(),
        })
    }

    fn parse_special_tag(&mut self) -> TemplateNode {
        let start = self.pos;
        let (inner_start, inner_end) = self.read_braced();
        let (name, expression) = split_keyword(&self.source[inner_start + 1..inner_end]);
        TemplateNode::SpecialTag(SpecialTag {
            span: self.span(start, self.pos),
            name: SmolStr::new(name),
            expression: expression.to_string(),
        })
    }

    fn parse_block(&mut self) -> TemplateNode {
        let start = self.pos;
        let (inner_start, inner_end) = self.read_braced();
        let (name, expression) = split_keyword(&self.source[inner_start + 1..inner_end]);
        let name = SmolStr::new(name);
        let expression = expression.to_string();
        let header_end = self.pos;

        let body = self.parse_fragment(Context::Block);
        let mut continuations = Vec::new();

        loop {
            if self.starts_with("{:") {
                let continuation_start = self.pos;
                let (inner_start, inner_end) = self.read_braced();
                let header = self.source[inner_start + 1..inner_end].trim().to_string();
                let body = self.parse_fragment(Context::Block);
                continuations.push(BlockContinuation {
                    span: self.span(continuation_start, self.pos),
                    header,
                    body,
                });
            } else if self.starts_with("{/") {
                let close_start = self.pos;
                let (inner_start, inner_end) = self.read_braced();
                let found = self.source[inner_start + 1..inner_end].trim();
                if found != name {
                    let found = found.to_string();
                    self.error(
                        ParseErrorKind::MismatchedBlockClose {
                            expected: name.to_string(),
                            found,
                        },
                        close_start,
                        self.pos,
                    );
                }
                break;
            } else {
                self.error(
                    ParseErrorKind::UnclosedBlock {
                        block_type: name.to_string(),
                    },
                    start,
                    header_end,
                );
                break;
            }
        }

        TemplateNode::Block(Block {
            span: self.span(start, self.pos),
            name,
            expression,
            body,
            continuations,
        })
    }

    fn parse_element(&mut self) -> TemplateNode {
        let start = self.pos;
        self.pos += 1;
        let name_start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !(b.is_ascii_whitespace() || b == b'/' || b == b'>'))
        {
            self.pos += 1;
        }
        let name = SmolStr::new(&self.source[name_start..self.pos]);
        let name_end = self.pos;
        let kind = ElementKind::of(&name);

        let attributes = self.parse_attributes();
        let self_closing = if self.eat("/>") {
            true
        } else {
            if !self.eat(">") {
                let end = self.bytes.len();
                self.error(
                    ParseErrorKind::UnexpectedEof {
                        expected: format!("'>' to close <{}>", name),
                    },
                    start,
                    end,
                );
            }
            false
        };

        let mut element = Element {
            span: Span::default(),
            name,
            kind,
            attributes,
            children: Vec::new(),
            self_closing,
        };

        let is_void = kind == ElementKind::Html && is_void_element(&element.name);
        if !self_closing && !is_void {
            if is_raw_text_element(&element.name) {
                let content_start = self.pos;
                let needle = format!("</{}", element.name);
                let content_end = self
                    .find_ascii_ci(content_start, &needle)
                    .unwrap_or(self.bytes.len());
                element.children.push(TemplateNode::Text(Text {
                    span: self.span(content_start, content_end),
                    data: self.source[content_start..content_end].to_string(),
                }));
                self.pos = content_end;
            } else {
                element.children = self.parse_fragment(Context::Element).nodes;
            }

            if self.starts_with("</") {
                let close_start = self.pos;
                let found = self.parse_closing_tag();
                if found != element.name {
                    self.error(
                        ParseErrorKind::MismatchedClosingTag {
                            expected: element.name.to_string(),
                            found,
                        },
                        close_start,
                        self.pos,
                    );
                }
            } else {
                self.error(
                    ParseErrorKind::UnclosedTag {
                        tag_name: element.name.to_string(),
                    },
                    start,
                    name_end,
                );
            }
        }

        element.span = self.span(start, self.pos);
        TemplateNode::Element(element)
    }

    /// Parses `</name>` and returns the name.
    fn parse_closing_tag(&mut self) -> String {
        self.pos += 2;
        let name_start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !(b.is_ascii_whitespace() || b == b'>'))
        {
            self.pos += 1;
        }
        let name = self.source[name_start..self.pos].to_string();
        self.skip_whitespace();
        if !self.eat(">") {
            let start = self.pos;
            self.error(
                ParseErrorKind::UnexpectedEof {
                    expected: "'>'".to_string(),
                },
                start,
                start,
            );
        }
        name
    }

    // === Attributes ===

    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b'>') => break,
                Some(b'/') if self.starts_with("/>") => break,
                Some(b'{') => attributes.push(self.parse_expression_attribute()),
                _ => {
                    if let Some(attribute) = self.parse_attribute() {
                        attributes.push(attribute);
                    }
                }
            }
        }
        attributes
    }

    /// Parses `{...spread}`, `{@attach fn}` or `{shorthand}`.
    fn parse_expression_attribute(&mut self) -> Attribute {
        let start = self.pos;
        let (inner_start, inner_end) = self.read_braced();
        let inner = self.source[inner_start..inner_end].trim();
        let span = self.span(start, self.pos);
        if let Some(rest) = inner.strip_prefix("...") {
            Attribute::Spread(ExpressionAttribute {
                span,
                expression: rest.trim().to_string(),
            })
        } else if let Some(rest) = inner.strip_prefix("@attach") {
            Attribute::Attach(ExpressionAttribute {
                span,
                expression: rest.trim().to_string(),
            })
        } else {
            Attribute::Shorthand(ExpressionAttribute {
                span,
                expression: inner.to_string(),
            })
        }
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let start = self.pos;
        while self.peek().is_some_and(|b| {
            !(b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'' | b'{'))
        }) {
            self.pos += 1;
        }
        if self.pos == start {
            self.bump_char();
            let found = self.source[start..self.pos].to_string();
            self.error(
                ParseErrorKind::InvalidAttribute {
                    message: format!("unexpected '{}'", found),
                },
                start,
                self.pos,
            );
            return None;
        }
        let name = &self.source[start..self.pos];

        let after_name = self.pos;
        self.skip_whitespace();
        let value = if self.eat("=") {
            self.skip_whitespace();
            self.parse_attribute_value()
        } else {
            self.pos = after_name;
            AttributeValue::True
        };
        let span = self.span(start, self.pos);

        if let Some((prefix, rest)) = name.split_once(':') {
            if let Some(kind) = DirectiveKind::from_prefix(prefix) {
                let mut parts = rest.split('|');
                let directive_name = SmolStr::new(parts.next().unwrap_or_default());
                let modifiers = parts.map(SmolStr::new).collect();
                return Some(Attribute::Directive(Directive {
                    span,
                    kind,
                    name: directive_name,
                    modifiers,
                    value,
                }));
            }
        }

        Some(Attribute::Normal(NormalAttribute {
            span,
            name: SmolStr::new(name),
            value,
        }))
    }

    fn parse_attribute_value(&mut self) -> AttributeValue {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                let open = self.pos;
                self.pos += 1;
                let parts = self.parse_value_parts(|parser| parser.peek() == Some(quote));
                if !self.eat(if quote == b'"' { "\"" } else { "'" }) {
                    let end = self.bytes.len();
                    self.error(
                        ParseErrorKind::UnexpectedEof {
                            expected: format!("closing {}", quote as char),
                        },
                        open,
                        end,
                    );
                }
                into_value(parts, self.span(open + 1, open + 1))
            }
            Some(b'{') => {
                let start = self.pos;
                let (inner_start, inner_end) = self.read_braced();
                AttributeValue::Expression(ExpressionValue {
                    span: self.span(start, self.pos),
                    expression: self.source[inner_start..inner_end].trim().to_string(),
                })
            }
            _ => {
                let start = self.pos;
                let parts = self.parse_value_parts(|parser| {
                    parser.peek().is_some_and(|b| b.is_ascii_whitespace() || b == b'>')
                        || parser.starts_with("/>")
                });
                into_value(parts, self.span(start, start))
            }
        }
    }

    /// Reads text and `{expression}` parts until `stop` holds or input ends.
    fn parse_value_parts(&mut self, stop: impl Fn(&Self) -> bool) -> Vec<AttributeValuePart> {
        let mut parts = Vec::new();
        let mut text_start = self.pos;
        while !self.at_end() && !stop(self) {
            if self.peek() == Some(b'{') {
                if self.pos > text_start {
                    parts.push(AttributeValuePart::Text(TextValue {
                        span: self.span(text_start, self.pos),
                        value: self.source[text_start..self.pos].to_string(),
                    }));
                }
                let start = self.pos;
                let (inner_start, inner_end) = self.read_braced();
                parts.push(AttributeValuePart::Expression(ExpressionValue {
                    span: self.span(start, self.pos),
                    expression: self.source[inner_start..inner_end].trim().to_string(),
                }));
                text_start = self.pos;
            } else {
                self.pos += 1;
            }
        }
        if self.pos > text_start {
            parts.push(AttributeValuePart::Text(TextValue {
                span: self.span(text_start, self.pos),
                value: self.source[text_start..self.pos].to_string(),
            }));
        }
        parts
    }
}

/// Builds an attribute value from its parts; `empty` is used for `""`.
fn into_value(mut parts: Vec<AttributeValuePart>, empty: Span) -> AttributeValue {
    match parts.len() {
        0 => AttributeValue::Text(TextValue {
            span: empty,
            value: String::new(),
        }),
        1 => match parts.remove(0) {
            AttributeValuePart::Text(text) => AttributeValue::Text(text),
            AttributeValuePart::Expression(expression) => AttributeValue::Expression(expression),
        },
        _ => AttributeValue::Concat(parts),
    }
}

/// Splits `if cond` into `("if", "cond")`.
fn split_keyword(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(text.len());
    (&text[..end], text[end..].trim())
}

/// Returns the static text of a normal attribute, `""` for a bare one.
fn attribute_text<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes.iter().find_map(|attribute| match attribute {
        Attribute::Normal(a) if a.name == name => match &a.value {
            AttributeValue::True => Some(""),
            AttributeValue::Text(text) => Some(text.value.as_str()),
            _ => None,
        },
        _ => None,
    })
}

/// Returns the raw text content of a script or style element.
fn raw_content(element: &Element) -> (String, Span) {
    match element.children.first() {
        Some(TemplateNode::Text(text)) => (text.data.clone(), text.span),
        _ => (String::new(), Span::empty(element.span.end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::{CssNode, SimpleSelector};
    use crate::parse;
    use pretty_assertions::assert_eq;

    fn parse_ok(source: &str) -> SvelteDocument {
        let result = parse(source);
        assert!(
            result.errors.is_empty(),
            "unexpected errors: {:?}",
            result.errors
        );
        result.document
    }

    fn first_element(doc: &SvelteDocument) -> &Element {
        doc.fragment
            .nodes
            .iter()
            .find_map(|node| match node {
                TemplateNode::Element(el) => Some(el),
                _ => None,
            })
            .expect("element")
    }

    #[test]
    fn test_parse_simple_element() {
        let doc = parse_ok("<div>Hello</div>");
        let el = first_element(&doc);
        assert_eq!(el.name, "div");
        assert_eq!(el.kind, ElementKind::Html);
        assert_eq!(el.children.len(), 1);
        assert!(matches!(&el.children[0], TemplateNode::Text(t) if t.data == "Hello"));
    }

    #[test]
    fn test_parse_unicode_text() {
        let doc = parse_ok("<p>héllo wörld 日本</p>");
        let el = first_element(&doc);
        assert!(matches!(&el.children[0], TemplateNode::Text(t) if t.data == "héllo wörld 日本"));
    }

    #[test]
    fn test_parse_component_and_self_closing() {
        let doc = parse_ok("<Button label=\"Go\" />");
        let el = first_element(&doc);
        assert_eq!(el.kind, ElementKind::Component);
        assert!(el.self_closing);
    }

    #[test]
    fn test_parse_class_attribute() {
        let doc = parse_ok("<div class=\"card  wide\"></div>");
        let el = first_element(&doc);
        let Attribute::Normal(attr) = &el.attributes[0] else {
            panic!("expected normal attribute");
        };
        assert_eq!(attr.name, "class");
        assert_eq!(
            attr.value.text_parts().iter().map(|t| t.value.as_str()).collect::<Vec<_>>(),
            vec!["card  wide"]
        );
    }

    #[test]
    fn test_parse_concatenated_attribute() {
        let doc = parse_ok("<div class=\"btn {size} wide\"></div>");
        let el = first_element(&doc);
        let Attribute::Normal(attr) = &el.attributes[0] else {
            panic!("expected normal attribute");
        };
        let AttributeValue::Concat(parts) = &attr.value else {
            panic!("expected concat, got {:?}", attr.value);
        };
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[1], AttributeValuePart::Expression(e) if e.expression == "size"));
    }

    #[test]
    fn test_parse_expression_only_attribute() {
        let doc = parse_ok("<div class={active ? 'a' : 'b'}></div>");
        let el = first_element(&doc);
        let Attribute::Normal(attr) = &el.attributes[0] else {
            panic!("expected normal attribute");
        };
        assert!(
            matches!(&attr.value, AttributeValue::Expression(e) if e.expression == "active ? 'a' : 'b'")
        );
    }

    #[test]
    fn test_parse_unquoted_and_boolean_attributes() {
        let doc = parse_ok("<input type=checkbox disabled>");
        let el = first_element(&doc);
        assert!(el.children.is_empty());
        assert!(matches!(&el.attributes[0], Attribute::Normal(a) if a.name == "type"
            && matches!(&a.value, AttributeValue::Text(t) if t.value == "checkbox")));
        assert!(matches!(&el.attributes[1], Attribute::Normal(a) if a.value == AttributeValue::True));
    }

    #[test]
    fn test_parse_directive_with_modifiers() {
        let doc = parse_ok("<button on:click|preventDefault|once={go} class:active={on}>x</button>");
        let el = first_element(&doc);
        let Attribute::Directive(on) = &el.attributes[0] else {
            panic!("expected directive");
        };
        assert_eq!(on.kind, DirectiveKind::On);
        assert_eq!(on.name, "click");
        assert_eq!(on.modifiers, vec![SmolStr::new("preventDefault"), SmolStr::new("once")]);
        let Attribute::Directive(class) = &el.attributes[1] else {
            panic!("expected directive");
        };
        assert_eq!(class.kind, DirectiveKind::Class);
        assert_eq!(class.name, "active");
    }

    #[test]
    fn test_parse_shorthand_spread_attach() {
        let doc = parse_ok("<div {id} {...rest} {@attach tooltip}></div>");
        let el = first_element(&doc);
        assert!(matches!(&el.attributes[0], Attribute::Shorthand(a) if a.expression == "id"));
        assert!(matches!(&el.attributes[1], Attribute::Spread(a) if a.expression == "rest"));
        assert!(matches!(&el.attributes[2], Attribute::Attach(a) if a.expression == "tooltip"));
    }

    #[test]
    fn test_parse_if_block_with_continuations() {
        let doc = parse_ok("{#if a}<p>a</p>{:else if b}<p>b</p>{:else}<p>c</p>{/if}");
        let TemplateNode::Block(block) = &doc.fragment.nodes[0] else {
            panic!("expected block");
        };
        assert_eq!(block.name, "if");
        assert_eq!(block.expression, "a");
        assert_eq!(block.continuations.len(), 2);
        assert_eq!(block.continuations[0].header, "else if b");
        assert_eq!(block.fragments().count(), 3);
    }

    #[test]
    fn test_parse_each_block() {
        let doc = parse_ok("{#each items as item, i (item.id)}<li>{item.name}</li>{/each}");
        let TemplateNode::Block(block) = &doc.fragment.nodes[0] else {
            panic!("expected block");
        };
        assert_eq!(block.name, "each");
        assert_eq!(block.expression, "items as item, i (item.id)");
    }

    #[test]
    fn test_parse_special_tags() {
        let doc = parse_ok("{@html content}{@render child()}");
        assert!(matches!(&doc.fragment.nodes[0],
            TemplateNode::SpecialTag(t) if t.name == "html" && t.expression == "content"));
        assert!(matches!(&doc.fragment.nodes[1],
            TemplateNode::SpecialTag(t) if t.name == "render" && t.expression == "child()"));
    }

    #[test]
    fn test_parse_braces_in_strings_and_templates() {
        let doc = parse_ok("<p>{ '}' + `a${ {b: 1}.b }}` /* } */ }</p>");
        let el = first_element(&doc);
        assert!(matches!(&el.children[0], TemplateNode::Expression(e)
            if e.expression == "'}' + `a${ {b: 1}.b }}` /* } */"));
    }

    #[test]
    fn test_parse_comment() {
        let doc = parse_ok("<!-- <div class=\"x\"> -->");
        assert!(matches!(&doc.fragment.nodes[0], TemplateNode::Comment(c) if c.data == " <div class=\"x\"> "));
    }

    #[test]
    fn test_less_than_in_text() {
        let doc = parse_ok("<p>a < b</p>");
        let el = first_element(&doc);
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_all_void_elements() {
        for name in HTML_VOID_ELEMENTS {
            let source = format!("<div><{}></div>", name);
            let doc = parse_ok(&source);
            let el = first_element(&doc);
            assert_eq!(el.children.len(), 1, "void element {}", name);
        }
    }

    #[test]
    fn test_scripts_and_style_are_lifted() {
        let source = "<script context=\"module\">export const x = 1;</script>\n<script lang=\"ts\">let a: number = 1;</script>\n<div class=\"a\"></div>\n<style>.a { color: red; }</style>";
        let doc = parse_ok(source);
        let module = doc.module_script.as_ref().expect("module script");
        assert_eq!(module.context, ScriptContext::Module);
        let instance = doc.instance_script.as_ref().expect("instance script");
        assert_eq!(instance.lang, ScriptLang::TypeScript);
        assert_eq!(instance.content, "let a: number = 1;");

        let style = doc.style.as_ref().expect("style");
        assert_eq!(style.content, ".a { color: red; }");
        assert_eq!(style.content_span.slice(source), ".a { color: red; }");
        let CssNode::Rule(rule) = &style.stylesheet.children[0] else {
            panic!("expected rule");
        };
        assert_eq!(rule.span.slice(source), ".a { color: red; }");
        assert_eq!(
            rule.prelude.children[0].children,
            vec![SimpleSelector::Class(SmolStr::new("a"))]
        );

        assert!(doc
            .fragment
            .nodes
            .iter()
            .all(|n| !matches!(n, TemplateNode::Element(e) if e.name == "script" || e.name == "style")));
    }

    #[test]
    fn test_script_content_is_raw() {
        let doc = parse_ok("<script>if (a < b) { x = '</div>'; }</script>");
        let script = doc.instance_script.expect("script");
        assert_eq!(script.content, "if (a < b) { x = '</div>'; }");
    }

    #[test]
    fn test_duplicate_style() {
        let result = parse("<style>.a{}</style><style>.b{}</style>");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::DuplicateStyle);
    }

    #[test]
    fn test_unclosed_tag() {
        let result = parse("<div><p>text</div>");
        assert!(result.errors.iter().any(|e| matches!(
            &e.kind,
            ParseErrorKind::MismatchedClosingTag { expected, found } if expected == "p" && found == "div"
        )));
    }

    #[test]
    fn test_unexpected_closing_tag() {
        let result = parse("</div>");
        assert_eq!(
            result.errors[0].kind,
            ParseErrorKind::UnexpectedClosingTag {
                tag_name: "div".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_block() {
        let result = parse("{#if x}<p></p>");
        assert_eq!(
            result.errors[0].kind,
            ParseErrorKind::UnclosedBlock {
                block_type: "if".to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_block_close() {
        let result = parse("{#if x}{/each}");
        assert!(matches!(
            &result.errors[0].kind,
            ParseErrorKind::MismatchedBlockClose { expected, found } if expected == "if" && found == "each"
        ));
    }

    #[test]
    fn test_css_error_position() {
        let source = "<p></p>\n<style>\n.a ! .b { color: red }\n</style>";
        let result = parse(source);
        assert_eq!(result.errors.len(), 1);
        let pos = result.errors[0].line_col(source);
        assert_eq!(pos.line, 3);
    }
}
