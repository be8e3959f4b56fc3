//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Removes global CSS rules that no Svelte component uses.
#[derive(Debug, Parser)]
#[command(name = "svelte-prune-css")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Stylesheet to prune
    #[arg(long)]
    pub input: Option<Utf8PathBuf>,

    /// Output location (defaults to the input path)
    #[arg(long)]
    pub output: Option<Utf8PathBuf>,

    /// Glob patterns selecting component files (default: src/**/*.svelte)
    #[arg(long)]
    pub include: Vec<String>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Project root; relative paths are resolved against it
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Path to a svelte-prune-css.json config file
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Leave the content hash out of the output file name
    #[arg(long = "no-hash")]
    pub no_hash: bool,

    /// Write the pruned stylesheet without minifying it
    #[arg(long = "no-minify")]
    pub no_minify: bool,

    /// Also remove unused rules inside @media, @supports and @container
    #[arg(long = "prune-nested")]
    pub prune_nested: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Report without writing the output file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Watch mode
    #[arg(long)]
    pub watch: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long = "preserveWatchOutput")]
    pub preserve_watch_output: bool,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Human,
    /// JSON report
    Json,
}
