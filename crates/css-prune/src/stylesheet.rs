//! Parsing, pruning, printing and minifying the input stylesheet.

use crate::error::{PruneError, Result};
use crate::filter::{filter_rules, FilterOptions};
use crate::usage::UsageIndex;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Parses a stylesheet.
///
/// Invalid rules and declarations are skipped and logged, so legacy hacks
/// such as `*zoom: 1` do not abort the run.
pub fn parse_stylesheet<'i>(source: &'i str, filename: &str) -> Result<StyleSheet<'i, 'static>> {
    let warnings = Arc::new(RwLock::new(Vec::new()));
    let options = ParserOptions {
        filename: filename.to_string(),
        error_recovery: true,
        warnings: Some(Arc::clone(&warnings)),
        ..ParserOptions::default()
    };
    let sheet = StyleSheet::parse(source, options).map_err(|err| PruneError::Parse {
        filename: filename.to_string(),
        message: err.to_string(),
    })?;
    if let Ok(warnings) = warnings.read() {
        for warning in warnings.iter() {
            warn!(%warning, "skipped invalid css");
        }
    }
    Ok(sheet)
}

/// Removes unused rules from the sheet's top-level rule list and returns the
/// omitted selectors.
pub fn prune_stylesheet(
    sheet: &mut StyleSheet<'_, '_>,
    index: &UsageIndex,
    options: &FilterOptions,
) -> Vec<String> {
    let rules = std::mem::take(&mut sheet.rules.0);
    let outcome = filter_rules(rules, index, options);
    sheet.rules.0 = outcome.kept;
    outcome.omitted
}

/// Prints a sheet without minification.
pub fn serialize(sheet: &StyleSheet<'_, '_>) -> Result<String> {
    sheet
        .to_css(PrinterOptions::default())
        .map(|printed| printed.code)
        .map_err(|err| PruneError::Print {
            message: err.to_string(),
        })
}

/// Reparses `css`, minifies it and prints it compactly.
pub fn minify(css: &str, filename: &str) -> Result<String> {
    let mut sheet = parse_stylesheet(css, filename)?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|err| PruneError::Minify {
            filename: filename.to_string(),
            message: err.to_string(),
        })?;
    sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map(|printed| printed.code)
        .map_err(|err| PruneError::Print {
            message: err.to_string(),
        })
}
