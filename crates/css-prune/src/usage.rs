//! The usage index: every class name seen in the component corpus.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use smol_str::SmolStr;
use std::borrow::Cow;

/// Where a class usage was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// A `class` attribute or `class:` directive.
    Markup,
    /// A component `<style>` block.
    Style,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Markup => write!(f, "markup"),
            Origin::Style => write!(f, "style"),
        }
    }
}

/// Map from dot-prefixed class token to the origin it was last recorded with.
///
/// Keys keep their first insertion position; recording an existing key only
/// replaces its origin.
#[derive(Debug, Clone, Default)]
pub struct UsageIndex {
    entries: IndexMap<SmolStr, Origin, FxBuildHasher>,
}

fn normalize(name: &str) -> Cow<'_, str> {
    if name.starts_with('.') {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!(".{}", name))
    }
}

impl UsageIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` (with or without its leading dot).
    pub fn record(&mut self, name: &str, origin: Origin) {
        let key = SmolStr::new(normalize(name));
        self.entries.insert(key, origin);
    }

    /// Returns true if `token` has been recorded.
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&*normalize(token))
    }

    /// Returns the origin `token` was last recorded with.
    pub fn origin(&self, token: &str) -> Option<Origin> {
        self.entries.get(&*normalize(token)).copied()
    }

    /// Number of distinct class tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates tokens in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Origin)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Records every entry of `other`, in its order.
    pub fn merge(&mut self, other: UsageIndex) {
        for (key, origin) in other.entries {
            self.entries.insert(key, origin);
        }
    }
}

impl<N: AsRef<str>> FromIterator<(N, Origin)> for UsageIndex {
    fn from_iter<T: IntoIterator<Item = (N, Origin)>>(iter: T) -> Self {
        let mut index = UsageIndex::new();
        for (name, origin) in iter {
            index.record(name.as_ref(), origin);
        }
        index
    }
}
