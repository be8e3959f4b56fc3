//! Document-order traversal of a parsed component.

use crate::ast::*;
use crate::css::{CssAtrule, CssNode, CssRule, StyleSheet};

/// A borrowed reference to any node the walk visits.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// An HTML element, component or `svelte:` element.
    Element(&'a Element),
    /// A text node.
    Text(&'a Text),
    /// An HTML comment.
    Comment(&'a Comment),
    /// An `{expression}` tag.
    Expression(&'a ExpressionTag),
    /// An `{@...}` tag.
    SpecialTag(&'a SpecialTag),
    /// A `{#...}` block.
    Block(&'a Block),
    /// The component stylesheet.
    StyleSheet(&'a StyleSheet),
    /// A style rule.
    CssRule(&'a CssRule),
    /// An at-rule.
    CssAtrule(&'a CssAtrule),
}

/// Callbacks for [`walk`]. Both default to doing nothing.
pub trait Visit {
    /// Called before a node's children are visited.
    fn enter(&mut self, _node: Node<'_>) {}

    /// Called after a node's children are visited.
    fn leave(&mut self, _node: Node<'_>) {}
}

/// Visits every template node, then the stylesheet, in document order.
pub fn walk<V: Visit + ?Sized>(document: &SvelteDocument, visitor: &mut V) {
    walk_nodes(&document.fragment.nodes, visitor);
    if let Some(style) = &document.style {
        let node = Node::StyleSheet(&style.stylesheet);
        visitor.enter(node);
        walk_css(&style.stylesheet.children, visitor);
        visitor.leave(node);
    }
}

fn walk_nodes<V: Visit + ?Sized>(nodes: &[TemplateNode], visitor: &mut V) {
    for template_node in nodes {
        let node = match template_node {
            TemplateNode::Element(n) => Node::Element(n),
            TemplateNode::Text(n) => Node::Text(n),
            TemplateNode::Comment(n) => Node::Comment(n),
            TemplateNode::Expression(n) => Node::Expression(n),
            TemplateNode::SpecialTag(n) => Node::SpecialTag(n),
            TemplateNode::Block(n) => Node::Block(n),
        };
        visitor.enter(node);
        match template_node {
            TemplateNode::Element(element) => walk_nodes(&element.children, visitor),
            TemplateNode::Block(block) => {
                for fragment in block.fragments() {
                    walk_nodes(&fragment.nodes, visitor);
                }
            }
            _ => {}
        }
        visitor.leave(node);
    }
}

fn walk_css<V: Visit + ?Sized>(nodes: &[CssNode], visitor: &mut V) {
    for css_node in nodes {
        match css_node {
            CssNode::Rule(rule) => {
                let node = Node::CssRule(rule);
                visitor.enter(node);
                walk_css(&rule.block.children, visitor);
                visitor.leave(node);
            }
            CssNode::Atrule(atrule) => {
                let node = Node::CssAtrule(atrule);
                visitor.enter(node);
                if let Some(block) = &atrule.block {
                    walk_css(&block.children, visitor);
                }
                visitor.leave(node);
            }
            CssNode::Declaration(_) => {}
        }
    }
}
