//! Class-usage collection from parsed components.

use crate::selector::unescape;
use crate::usage::{Origin, UsageIndex};
use smol_str::SmolStr;
use svelte_parser::css::{ComplexSelector, SimpleSelector};
use svelte_parser::{
    walk, Attribute, CssNode, DirectiveKind, Element, Node, SvelteDocument, Visit,
};

/// A node that can contribute class names.
#[derive(Debug, Clone, Copy)]
pub enum ClassSource<'a> {
    /// An element, component or `svelte:` element, through its attributes.
    Markup(&'a Element),
    /// The items of the component stylesheet or of an at-rule block.
    Style(&'a [CssNode]),
}

impl<'a> ClassSource<'a> {
    /// Selects the class source a walked node represents, if any.
    pub fn from_node(node: Node<'a>) -> Option<Self> {
        match node {
            Node::Element(element) => Some(ClassSource::Markup(element)),
            Node::StyleSheet(sheet) => Some(ClassSource::Style(&sheet.children)),
            Node::CssAtrule(atrule) => atrule
                .block
                .as_ref()
                .map(|block| ClassSource::Style(&block.children)),
            _ => None,
        }
    }

    /// The origin recorded for names from this source.
    pub fn origin(&self) -> Origin {
        match self {
            ClassSource::Markup(_) => Origin::Markup,
            ClassSource::Style(_) => Origin::Style,
        }
    }
}

/// Returns the class names (without dots) a source uses, in source order.
///
/// Markup contributes `class:` directive names and the whitespace-separated
/// words of static `class` attribute text. Style contributes, for each
/// selector of a rule with a non-empty block, the leading class of the
/// selector, or the leading classes of the selectors inside a leading
/// functional pseudo-class such as `:global(...)`.
pub fn collect(source: ClassSource<'_>) -> Vec<SmolStr> {
    match source {
        ClassSource::Markup(element) => collect_markup(element),
        ClassSource::Style(nodes) => collect_style(nodes),
    }
}

fn collect_markup(element: &Element) -> Vec<SmolStr> {
    let mut names = Vec::new();
    for attribute in &element.attributes {
        match attribute {
            Attribute::Directive(directive) if directive.kind == DirectiveKind::Class => {
                names.push(directive.name.clone());
            }
            Attribute::Normal(attr) if attr.name == "class" => {
                for text in attr.value.text_parts() {
                    names.extend(text.value.split_whitespace().map(SmolStr::new));
                }
            }
            _ => {}
        }
    }
    names
}

fn collect_style(nodes: &[CssNode]) -> Vec<SmolStr> {
    let mut names = Vec::new();
    for node in nodes {
        let CssNode::Rule(rule) = node else {
            continue;
        };
        if rule.block.children.is_empty() {
            continue;
        }
        for selector in &rule.prelude.children {
            match selector.children.first() {
                Some(SimpleSelector::PseudoClass(pseudo)) => {
                    for inner in pseudo.selectors.iter().flat_map(|list| &list.children) {
                        names.extend(leading_class(inner));
                    }
                }
                _ => names.extend(leading_class(selector)),
            }
        }
    }
    names
}

/// The class name of a selector's first component, if that component is a
/// class selector.
fn leading_class(selector: &ComplexSelector) -> Option<SmolStr> {
    match selector.children.first() {
        Some(SimpleSelector::Class(name)) => Some(SmolStr::new(unescape(name))),
        _ => None,
    }
}

/// Records every class name a parsed component uses into `index`.
///
/// Returns the number of names recorded, repeats included.
pub fn collect_document(document: &SvelteDocument, index: &mut UsageIndex) -> usize {
    let mut collector = Collector { index, recorded: 0 };
    walk(document, &mut collector);
    collector.recorded
}

struct Collector<'i> {
    index: &'i mut UsageIndex,
    recorded: usize,
}

impl Visit for Collector<'_> {
    fn enter(&mut self, node: Node<'_>) {
        let Some(source) = ClassSource::from_node(node) else {
            return;
        };
        let origin = source.origin();
        for name in collect(source) {
            self.index.record(&name, origin);
            self.recorded += 1;
        }
    }
}
