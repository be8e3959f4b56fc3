//! Rule filtering against the usage index.

use crate::selector::class_tokens;
use crate::usage::UsageIndex;
use lightningcss::rules::style::StyleRule;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::PrinterOptions;
use lightningcss::traits::ToCss;
use tracing::{trace, warn};

/// Options for [`filter_rules`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    /// Remove unused rules inside conditional groups too, and drop groups
    /// left empty by that. Off by default: groups are kept verbatim and their
    /// unused rules are only reported.
    pub prune_nested: bool,
}

/// The result of filtering a rule list.
#[derive(Debug, Default)]
pub struct FilterOutcome<'i> {
    /// Surviving rules, in their original order.
    pub kept: Vec<CssRule<'i>>,
    /// Selector text of every unused style rule, in encounter order.
    pub omitted: Vec<String>,
}

/// Returns true if a rule with this selector text must be kept.
///
/// Selectors without a `.` or without any class token are always kept;
/// otherwise at least one class token must be in the index.
pub fn selector_is_used(selector: &str, index: &UsageIndex) -> bool {
    if !selector.contains('.') {
        return true;
    }
    let mut tokens = class_tokens(selector).peekable();
    if tokens.peek().is_none() {
        return true;
    }
    tokens.any(|token| index.contains(&token))
}

/// Filters a rule list.
///
/// Plain style rules whose selectors use no recorded class are removed.
/// `@media`, `@supports` and `@container` groups are searched recursively;
/// see [`FilterOptions::prune_nested`]. All other rules are kept.
pub fn filter_rules<'i>(
    rules: Vec<CssRule<'i>>,
    index: &UsageIndex,
    options: &FilterOptions,
) -> FilterOutcome<'i> {
    let mut outcome = FilterOutcome::default();
    for rule in rules {
        match rule {
            CssRule::Style(style) => match unused_selector(&style, index) {
                Some(selector) => outcome.omitted.push(selector),
                None => outcome.kept.push(CssRule::Style(style)),
            },
            CssRule::Media(mut media) => {
                if filter_group(&mut media.rules.0, index, options, &mut outcome.omitted) {
                    outcome.kept.push(CssRule::Media(media));
                }
            }
            CssRule::Supports(mut supports) => {
                if filter_group(&mut supports.rules.0, index, options, &mut outcome.omitted) {
                    outcome.kept.push(CssRule::Supports(supports));
                }
            }
            CssRule::Container(mut container) => {
                if filter_group(&mut container.rules.0, index, options, &mut outcome.omitted) {
                    outcome.kept.push(CssRule::Container(container));
                }
            }
            other => outcome.kept.push(other),
        }
    }
    outcome
}

/// Filters the rules of a conditional group in place. Returns false if the
/// group itself should be dropped.
fn filter_group<'i>(
    rules: &mut Vec<CssRule<'i>>,
    index: &UsageIndex,
    options: &FilterOptions,
    omitted: &mut Vec<String>,
) -> bool {
    if !options.prune_nested {
        report_unused(rules, index, omitted);
        return true;
    }

    let had_rules = !rules.is_empty();
    let nested = filter_rules(std::mem::take(rules), index, options);
    omitted.extend(nested.omitted);
    *rules = nested.kept;
    !(had_rules && rules.is_empty())
}

/// Records unused nested selectors without touching the rules.
fn report_unused(rules: &[CssRule<'_>], index: &UsageIndex, omitted: &mut Vec<String>) {
    for rule in rules {
        match rule {
            CssRule::Style(style) => omitted.extend(unused_selector(style, index)),
            CssRule::Media(media) => report_unused(&media.rules.0, index, omitted),
            CssRule::Supports(supports) => report_unused(&supports.rules.0, index, omitted),
            CssRule::Container(container) => report_unused(&container.rules.0, index, omitted),
            _ => {}
        }
    }
}

/// Returns the selector text of `style` if the rule is unused.
fn unused_selector(style: &StyleRule<'_>, index: &UsageIndex) -> Option<String> {
    let selector = match style.selectors.to_css_string(PrinterOptions::default()) {
        Ok(selector) => selector,
        Err(err) => {
            warn!(error = %err, "keeping rule with unprintable selector");
            return None;
        }
    };
    if selector_is_used(&selector, index) {
        None
    } else {
        trace!(selector = %selector, "omitting rule");
        Some(selector)
    }
}
