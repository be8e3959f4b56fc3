//! Static dead-code elimination for global stylesheets used by Svelte
//! components.
//!
//! The pipeline has four parts:
//! - [`collect`]: class names used by a parsed component, from markup
//!   `class` attributes and `class:` directives and from `<style>` blocks
//! - [`usage`]: the index those names are recorded into
//! - [`selector`]: the tokenizer turning selector text into lookup keys
//! - [`filter`]: removal of style rules none of whose keys are in the index
//!
//! [`stylesheet`] wraps `lightningcss` for parsing, printing and minifying.
//!
//! # Example
//!
//! ```
//! use css_prune::{collect_document, stylesheet, FilterOptions, UsageIndex};
//!
//! let component = svelte_parser::parse(r#"<p class="lead">Hi</p>"#);
//! let mut index = UsageIndex::new();
//! collect_document(&component.document, &mut index);
//!
//! let mut sheet = stylesheet::parse_stylesheet(
//!     ".lead { font-size: 2rem } .unused { color: red }",
//!     "global.css",
//! )
//! .unwrap();
//! let omitted = stylesheet::prune_stylesheet(&mut sheet, &index, &FilterOptions::default());
//! assert_eq!(omitted, vec![".unused"]);
//! ```

pub mod collect;
mod error;
pub mod filter;
pub mod selector;
pub mod stylesheet;
pub mod usage;

pub use collect::{collect, collect_document, ClassSource};
pub use error::{PruneError, Result};
pub use filter::{filter_rules, selector_is_used, FilterOptions, FilterOutcome};
pub use selector::{class_tokens, ClassTokens};
pub use usage::{Origin, UsageIndex};
