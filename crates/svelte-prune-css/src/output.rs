//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8PathBuf;
use css_prune::{Origin, UsageIndex};
use serde::Serialize;

/// The result of one pruning run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Number of component files scanned.
    pub component_count: usize,
    /// Number of distinct classes recorded.
    pub class_count: usize,
    /// Every recorded class with where it was last seen.
    pub classes: Vec<DetectedClass>,
    /// Selectors of the removed rules, in stylesheet order.
    pub removed: Vec<String>,
    /// The input stylesheet, as given.
    pub input: Utf8PathBuf,
    /// Where the output was (or would be) written.
    pub output: Utf8PathBuf,
    /// Input size in bytes.
    pub original_size: usize,
    /// Output size in bytes.
    pub new_size: usize,
    /// False for dry runs.
    pub written: bool,
}

/// A class recorded from the components.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedClass {
    /// The dot-prefixed class token.
    pub name: String,
    /// Markup or component style.
    pub origin: Origin,
}

impl DetectedClass {
    /// Lists the entries of `index` in recording order.
    pub fn from_index(index: &UsageIndex) -> Vec<Self> {
        index
            .iter()
            .map(|(name, origin)| Self {
                name: name.to_string(),
                origin,
            })
            .collect()
    }
}

/// A byte count scaled for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// The scaled value.
    pub value: f64,
    /// `bytes`, `kB` or `MB`.
    pub unit: &'static str,
}

impl Size {
    /// Scales a byte count: below 1000 as bytes, from one million as MB,
    /// kB in between.
    pub fn of(bytes: i64) -> Self {
        if bytes < 1000 {
            Self {
                value: bytes as f64,
                unit: "bytes",
            }
        } else if bytes >= 1_000_000 {
            Self {
                value: bytes as f64 / 1_000_000.0,
                unit: "MB",
            }
        } else {
            Self {
                value: bytes as f64 / 1000.0,
                unit: "kB",
            }
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unit == "bytes" {
            write!(f, "{} {}", self.value, self.unit)
        } else {
            let value = format!("{:.2}", self.value);
            let value = value.trim_end_matches('0').trim_end_matches('.');
            write!(f, "{} {}", value, self.unit)
        }
    }
}

/// Percentage of `original` saved by shrinking it to `new`.
pub fn percent_saved(original: usize, new: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    100.0 * (original as f64 - new as f64) / original as f64
}

/// Formats run reports.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a report.
    pub fn format(&self, report: &RunReport) -> String {
        match self.format {
            OutputFormat::Human => Self::format_human(report),
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            }
        }
    }

    fn format_human(report: &RunReport) -> String {
        let saved = report.original_size as i64 - report.new_size as i64;
        let mut output = String::new();

        output.push_str(&format!(
            "Detected {} from {} Svelte {}\n",
            plural(report.class_count, "class", "classes"),
            report.component_count,
            if report.component_count == 1 {
                "component"
            } else {
                "components"
            },
        ));
        output.push_str(&format!(
            "Removed {} from \"{}\"\n",
            plural(report.removed.len(), "class", "classes"),
            report.input
        ));
        output.push_str(&format!(
            "Original size: {}\n",
            Size::of(report.original_size as i64)
        ));
        output.push_str(&format!("New size: {}\n", Size::of(report.new_size as i64)));
        output.push_str(&format!(
            "> {} ({:.1}%) smaller!\n",
            Size::of(saved),
            percent_saved(report.original_size, report.new_size)
        ));
        if report.written {
            output.push_str(&format!("> Saved output to \"{}\"\n", report.output));
        } else {
            output.push_str(&format!(
                "> Dry run, output not written to \"{}\"\n",
                report.output
            ));
        }

        output
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
