//! Parse error types.

use crate::span::{LineCol, Span};
use thiserror::Error;

/// An error that occurred during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the 1-based line/column of the error start within `source`.
    pub fn line_col(&self, source: &str) -> LineCol {
        LineCol::of(source, self.span.start)
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An unexpected end of file was encountered.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },

    /// An element was never closed.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed tag.
        tag_name: String,
    },

    /// A closing tag did not match the open element.
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// The expected tag name.
        expected: String,
        /// The found tag name.
        found: String,
    },

    /// A closing tag appeared with no open element.
    #[error("unexpected closing tag: </{tag_name}>")]
    UnexpectedClosingTag {
        /// The name in the closing tag.
        tag_name: String,
    },

    /// A block was never closed.
    #[error("unclosed block: {{#{block_type}}}")]
    UnclosedBlock {
        /// The type of block (if, each, await, key, snippet).
        block_type: String,
    },

    /// A block was closed with the wrong name.
    #[error("mismatched block close: expected {{/{expected}}}, found {{/{found}}}")]
    MismatchedBlockClose {
        /// The block being closed.
        expected: String,
        /// The name in the close tag.
        found: String,
    },

    /// A block continuation or close appeared outside of any block.
    #[error("unexpected block tag: {{{tag}}}")]
    UnexpectedBlockTag {
        /// The tag content, including its sigil.
        tag: String,
    },

    /// An invalid attribute was found.
    #[error("invalid attribute: {message}")]
    InvalidAttribute {
        /// A description of the problem.
        message: String,
    },

    /// More than one top-level `<style>` element.
    #[error("a component can only have one top-level <style> element")]
    DuplicateStyle,

    /// A syntax error inside a `<style>` block.
    #[error("css syntax error: {message}")]
    InvalidCss {
        /// A description of the problem.
        message: String,
    },
}
