//! AST types for Svelte components.
//!
//! The template side mirrors the shape of the Svelte compiler's AST closely
//! enough for static analysis; expressions are kept as raw source text.
//! The style side lives in [`crate::css`].

use crate::css::StyleSheet;
use crate::span::Span;
use smol_str::SmolStr;

/// A complete Svelte document.
#[derive(Debug, Clone, Default)]
pub struct SvelteDocument {
    /// The module-level script (`<script module>` / `<script context="module">`).
    pub module_script: Option<Script>,
    /// The instance script (`<script>`).
    pub instance_script: Option<Script>,
    /// The component-scoped style block (`<style>`).
    pub style: Option<Style>,
    /// The template fragment.
    pub fragment: Fragment,
    /// The span of the entire document.
    pub span: Span,
}

/// A script block.
#[derive(Debug, Clone)]
pub struct Script {
    /// The span of the entire script block including tags.
    pub span: Span,
    /// The span of just the script content.
    pub content_span: Span,
    /// The raw content of the script.
    pub content: String,
    /// The script language.
    pub lang: ScriptLang,
    /// The script context.
    pub context: ScriptContext,
}

/// The language of a script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptLang {
    /// JavaScript (default).
    #[default]
    JavaScript,
    /// TypeScript.
    TypeScript,
}

/// The context of a script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptContext {
    /// Default instance context.
    #[default]
    Default,
    /// Module context.
    Module,
}

/// A style block.
#[derive(Debug, Clone)]
pub struct Style {
    /// The span of the entire style block including tags.
    pub span: Span,
    /// The span of just the style content.
    pub content_span: Span,
    /// The raw content of the style.
    pub content: String,
    /// Whether the block carries the `global` attribute.
    pub global: bool,
    /// Attributes on the style tag.
    pub attributes: Vec<Attribute>,
    /// The parsed stylesheet. Spans are relative to the whole document.
    pub stylesheet: StyleSheet,
}

/// A template fragment containing child nodes.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    /// The child nodes.
    pub nodes: Vec<TemplateNode>,
    /// The span of the fragment.
    pub span: Span,
}

/// A node in the template.
#[derive(Debug, Clone)]
pub enum TemplateNode {
    /// An HTML element, component or `svelte:` element.
    Element(Element),
    /// Text content.
    Text(Text),
    /// A comment.
    Comment(Comment),
    /// An expression `{expr}`.
    Expression(ExpressionTag),
    /// A special tag such as `{@html expr}` or `{@const x = y}`.
    SpecialTag(SpecialTag),
    /// A block such as `{#if}` or `{#each}`.
    Block(Block),
}

impl TemplateNode {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            TemplateNode::Element(n) => n.span,
            TemplateNode::Text(n) => n.span,
            TemplateNode::Comment(n) => n.span,
            TemplateNode::Expression(n) => n.span,
            TemplateNode::SpecialTag(n) => n.span,
            TemplateNode::Block(n) => n.span,
        }
    }
}

/// What kind of tag an [`Element`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A regular HTML (or SVG/MathML) element.
    Html,
    /// A Svelte component (`<Button>`, `<ui.Card>`).
    Component,
    /// A special `svelte:` element (`<svelte:element>`, `<svelte:head>`, ...).
    Svelte,
}

impl ElementKind {
    /// Classifies a tag name.
    pub fn of(name: &str) -> Self {
        if name.starts_with("svelte:") {
            ElementKind::Svelte
        } else if name.starts_with(|c: char| c.is_ascii_uppercase()) || name.contains('.') {
            ElementKind::Component
        } else {
            ElementKind::Html
        }
    }
}

/// An element in the template.
#[derive(Debug, Clone)]
pub struct Element {
    /// The span of the element.
    pub span: Span,
    /// The tag name.
    pub name: SmolStr,
    /// What kind of tag this is.
    pub kind: ElementKind,
    /// The attributes.
    pub attributes: Vec<Attribute>,
    /// The child nodes.
    pub children: Vec<TemplateNode>,
    /// Whether this is a self-closing tag.
    pub self_closing: bool,
}

/// Text content.
#[derive(Debug, Clone)]
pub struct Text {
    /// The span of the text.
    pub span: Span,
    /// The text content.
    pub data: String,
}

/// A comment, or any other `<!...>` markup declaration.
#[derive(Debug, Clone)]
pub struct Comment {
    /// The span of the comment.
    pub span: Span,
    /// The comment content (without `<!--` and `-->`).
    pub data: String,
}

/// An expression tag `{expr}`.
#[derive(Debug, Clone)]
pub struct ExpressionTag {
    /// The span of the tag.
    pub span: Span,
    /// The raw expression text.
    pub expression: String,
}

/// A `{@name ...}` tag.
#[derive(Debug, Clone)]
pub struct SpecialTag {
    /// The span of the tag.
    pub span: Span,
    /// The tag name (`html`, `const`, `debug`, `render`, ...).
    pub name: SmolStr,
    /// The raw text after the name.
    pub expression: String,
}

/// A block such as `{#if cond}...{:else}...{/if}`.
#[derive(Debug, Clone)]
pub struct Block {
    /// The span of the entire block.
    pub span: Span,
    /// The block name (`if`, `each`, `await`, `key`, `snippet`, ...).
    pub name: SmolStr,
    /// The raw text after the block name in the opening tag.
    pub expression: String,
    /// The content before the first continuation.
    pub body: Fragment,
    /// `{:...}` continuations in source order.
    pub continuations: Vec<BlockContinuation>,
}

impl Block {
    /// Iterates the body and every continuation fragment.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        std::iter::once(&self.body).chain(self.continuations.iter().map(|c| &c.body))
    }
}

/// A `{:else}`, `{:else if x}`, `{:then v}` or `{:catch e}` branch.
#[derive(Debug, Clone)]
pub struct BlockContinuation {
    /// The span of the continuation tag.
    pub span: Span,
    /// The raw tag text after `{:`.
    pub header: String,
    /// The branch content.
    pub body: Fragment,
}

/// An attribute on an element or component.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// A normal attribute `name="value"` or `name={expr}`.
    Normal(NormalAttribute),
    /// A spread attribute `{...obj}`.
    Spread(ExpressionAttribute),
    /// A shorthand attribute `{value}`.
    Shorthand(ExpressionAttribute),
    /// An attach attribute `{@attach expr}`.
    Attach(ExpressionAttribute),
    /// A directive `use:action`, `class:name`, etc.
    Directive(Directive),
}

impl Attribute {
    /// Returns the span of this attribute.
    pub fn span(&self) -> Span {
        match self {
            Attribute::Normal(a) => a.span,
            Attribute::Spread(a) | Attribute::Shorthand(a) | Attribute::Attach(a) => a.span,
            Attribute::Directive(a) => a.span,
        }
    }
}

/// A normal attribute.
#[derive(Debug, Clone)]
pub struct NormalAttribute {
    /// The span of the attribute.
    pub span: Span,
    /// The attribute name.
    pub name: SmolStr,
    /// The attribute value.
    pub value: AttributeValue,
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// No value (boolean attribute).
    True,
    /// A string literal value.
    Text(TextValue),
    /// An expression value `{expr}`.
    Expression(ExpressionValue),
    /// A concatenation of text and expressions.
    Concat(Vec<AttributeValuePart>),
}

impl AttributeValue {
    /// Returns the literal text parts of this value in source order.
    pub fn text_parts(&self) -> Vec<&TextValue> {
        match self {
            AttributeValue::Text(text) => vec![text],
            AttributeValue::Concat(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    AttributeValuePart::Text(text) => Some(text),
                    AttributeValuePart::Expression(_) => None,
                })
                .collect(),
            AttributeValue::True | AttributeValue::Expression(_) => Vec::new(),
        }
    }
}

/// A part of a concatenated attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValuePart {
    /// A text part.
    Text(TextValue),
    /// An expression part.
    Expression(ExpressionValue),
}

/// A text value in an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextValue {
    /// The span of the text.
    pub span: Span,
    /// The text content.
    pub value: String,
}

/// An expression value in an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionValue {
    /// The span of the expression including braces.
    pub span: Span,
    /// The raw expression text.
    pub expression: String,
}

/// A brace-delimited attribute (`{...x}`, `{x}`, `{@attach x}`).
#[derive(Debug, Clone)]
pub struct ExpressionAttribute {
    /// The span of the attribute.
    pub span: Span,
    /// The raw expression (without the `...` or `@attach` prefix).
    pub expression: String,
}

/// A directive.
#[derive(Debug, Clone)]
pub struct Directive {
    /// The span of the directive.
    pub span: Span,
    /// The directive kind.
    pub kind: DirectiveKind,
    /// The directive name (after the colon).
    pub name: SmolStr,
    /// Modifiers (after `|`).
    pub modifiers: Vec<SmolStr>,
    /// The directive value.
    pub value: AttributeValue,
}

/// The kind of directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `on:event`
    On,
    /// `bind:prop`
    Bind,
    /// `class:name`
    Class,
    /// `style:prop`
    StyleDirective,
    /// `use:action`
    Use,
    /// `transition:name`
    Transition,
    /// `in:name`
    In,
    /// `out:name`
    Out,
    /// `animate:name`
    Animate,
    /// `let:name` (slot props)
    Let,
}

impl DirectiveKind {
    /// Maps a directive prefix (the part before `:`) to its kind.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Some(match prefix {
            "on" => DirectiveKind::On,
            "bind" => DirectiveKind::Bind,
            "class" => DirectiveKind::Class,
            "style" => DirectiveKind::StyleDirective,
            "use" => DirectiveKind::Use,
            "transition" => DirectiveKind::Transition,
            "in" => DirectiveKind::In,
            "out" => DirectiveKind::Out,
            "animate" => DirectiveKind::Animate,
            "let" => DirectiveKind::Let,
            _ => return None,
        })
    }
}
