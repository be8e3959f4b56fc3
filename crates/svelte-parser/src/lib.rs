//! Svelte component parser for svelte-prune-css.
//!
//! This crate parses `.svelte` files far enough for static class analysis:
//! - Template parser for elements, attributes, directives, blocks and tags
//! - `<script>` and `<style>` extraction
//! - A `logos`-based CSS parser for the component stylesheet
//! - A document-order tree walk over both
//!
//! Parsing always produces a document; problems are reported alongside it.
//!
//! # Example
//!
//! ```
//! use svelte_parser::{parse, walk, Node, Visit};
//!
//! let source = r#"
//! <button class="btn primary" class:active={on}>Go</button>
//!
//! <style>
//!     .btn { padding: 0; }
//! </style>
//! "#;
//!
//! struct Elements(usize);
//! impl Visit for Elements {
//!     fn enter(&mut self, node: Node<'_>) {
//!         if let Node::Element(_) = node {
//!             self.0 += 1;
//!         }
//!     }
//! }
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! let mut elements = Elements(0);
//! walk(&result.document, &mut elements);
//! assert_eq!(elements.0, 1);
//! ```

mod ast;
pub mod css;
mod error;
mod lexer;
mod parser;
mod span;
mod walk;

pub use ast::*;
pub use css::{CssAtrule, CssBlock, CssNode, CssRule, StyleSheet};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use span::{LineCol, Span};
pub use walk::{walk, Node, Visit};

/// Options for parsing Svelte files.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Whether to parse the `<style>` content into a stylesheet.
    pub parse_style: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { parse_style: true }
    }
}

/// The result of parsing a Svelte file.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed document.
    pub document: SvelteDocument,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Parses a Svelte source file into an AST.
///
/// This function will attempt to parse the entire file and recover from errors
/// where possible, returning both the AST and any errors encountered.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default())
}

/// Parses a Svelte source file with custom options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult {
    parser::Parser::new(source, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.document.fragment.nodes.is_empty());
        assert!(result.document.style.is_none());
    }

    #[test]
    fn test_skip_style_parsing() {
        let result = parse_with_options(
            "<style>.a ! b {}</style>",
            ParseOptions { parse_style: false },
        );
        assert!(result.errors.is_empty());
        let style = result.document.style.expect("style");
        assert!(style.stylesheet.children.is_empty());
        assert_eq!(style.content, ".a ! b {}");
    }
}
