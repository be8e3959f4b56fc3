//! Main orchestration logic.

use crate::cli::Args;
use crate::config::{ConfigError, Options};
use crate::output::{DetectedClass, Formatter, RunReport};
use camino::{Utf8Path, Utf8PathBuf};
use css_prune::{collect_document, stylesheet, FilterOptions, PruneError, UsageIndex};
use rayon::prelude::*;
use std::fs;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Length of the content hash in output file names.
const HASH_LENGTH: usize = 12;

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Invalid options.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to read a file.
    #[error("failed to read {path}: {message}")]
    ReadFailed { path: Utf8PathBuf, message: String },

    /// A component failed to parse.
    #[error("{path}:{line}:{column}: {message}")]
    ParseFailed {
        path: Utf8PathBuf,
        line: u32,
        column: u32,
        message: String,
    },

    /// The stylesheet could not be parsed, printed or minified.
    #[error(transparent)]
    Stylesheet(#[from] PruneError),

    /// Failed to write the output.
    #[error("failed to write {path}: {message}")]
    WriteFailed { path: Utf8PathBuf, message: String },

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Runs the pruner once, or repeatedly in watch mode.
pub async fn run(args: Args) -> Result<RunReport, OrchestratorError> {
    let options = Options::resolve(&args)?;

    if options.watch {
        run_watch_mode(&options).await
    } else {
        run_once(&options)
    }
}

/// Phase durations of one run.
#[derive(Debug, Default)]
struct Timings {
    scan: Duration,
    collect: Duration,
    prune: Duration,
    minify: Duration,
    total: Duration,
}

/// Runs a single pruning pass and prints its report.
fn run_once(options: &Options) -> Result<RunReport, OrchestratorError> {
    let total_start = Instant::now();
    let mut timings = Timings::default();

    let scan_start = Instant::now();
    let files = discover(options);
    timings.scan = scan_start.elapsed();
    debug!(count = files.len(), "discovered component files");

    let collect_start = Instant::now();
    let index = collect_usage(&options.workspace, &files)?;
    timings.collect = collect_start.elapsed();
    debug!(classes = index.len(), "class usage collected");

    let source = read(&options.input)?;
    let filename = display_path(&options.workspace, &options.input);

    let prune_start = Instant::now();
    let filter_options = FilterOptions {
        prune_nested: options.prune_nested,
    };
    let mut sheet = stylesheet::parse_stylesheet(&source, filename.as_str())?;
    let removed = stylesheet::prune_stylesheet(&mut sheet, &index, &filter_options);
    let pruned = stylesheet::serialize(&sheet)?;
    timings.prune = prune_start.elapsed();
    debug!(removed = removed.len(), "stylesheet pruned");

    let minify_start = Instant::now();
    let css = if options.minify {
        stylesheet::minify(&pruned, filename.as_str())?
    } else {
        pruned
    };
    timings.minify = minify_start.elapsed();

    let hash = options.hash.then(|| content_hash(&css));
    let output = output_path(&options.output, hash.as_deref());

    if !options.dry_run {
        write(&output, &css)?;
    }
    timings.total = total_start.elapsed();

    let report = RunReport {
        component_count: files.len(),
        class_count: index.len(),
        classes: DetectedClass::from_index(&index),
        removed,
        input: filename,
        output: display_path(&options.workspace, &output),
        original_size: source.len(),
        new_size: css.len(),
        written: !options.dry_run,
    };
    print!("{}", Formatter::new(options.format).format(&report));
    if options.timings {
        print_timings(&timings, files.len());
    }

    Ok(report)
}

/// Finds component files under the workspace, sorted by path.
fn discover(options: &Options) -> Vec<Utf8PathBuf> {
    let mut files: Vec<Utf8PathBuf> = WalkDir::new(&options.workspace)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| {
            let relative = p.strip_prefix(&options.workspace).unwrap_or(p);
            options.include.is_match(relative.as_str()) && !options.ignore.is_match(relative.as_str())
        })
        .collect();
    files.sort();
    files
}

/// Collects class usage from every component in parallel, then merges the
/// per-file indices in file order.
fn collect_usage(
    workspace: &Utf8Path,
    files: &[Utf8PathBuf],
) -> Result<UsageIndex, OrchestratorError> {
    let per_file = files
        .par_iter()
        .map(|path| collect_file(workspace, path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut index = UsageIndex::new();
    for file_index in per_file {
        index.merge(file_index);
    }
    Ok(index)
}

fn collect_file(workspace: &Utf8Path, path: &Utf8Path) -> Result<UsageIndex, OrchestratorError> {
    let source = read(path)?;
    let result = svelte_parser::parse(&source);

    if let Some(error) = result.errors.first() {
        let position = error.line_col(&source);
        return Err(OrchestratorError::ParseFailed {
            path: display_path(workspace, path),
            line: position.line,
            column: position.col,
            message: error.to_string(),
        });
    }

    let mut index = UsageIndex::new();
    let recorded = collect_document(&result.document, &mut index);
    debug!(file = %display_path(workspace, path), recorded, "collected classes");
    Ok(index)
}

fn read(path: &Utf8Path) -> Result<String, OrchestratorError> {
    fs::read_to_string(path).map_err(|e| OrchestratorError::ReadFailed {
        path: path.to_owned(),
        message: e.to_string(),
    })
}

fn write(path: &Utf8Path, css: &str) -> Result<(), OrchestratorError> {
    let failed = |e: std::io::Error| OrchestratorError::WriteFailed {
        path: path.to_owned(),
        message: e.to_string(),
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
        fs::create_dir_all(dir).map_err(failed)?;
    }
    fs::write(path, css).map_err(failed)
}

fn display_path(workspace: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    path.strip_prefix(workspace).unwrap_or(path).to_owned()
}

/// First characters of the blake3 hash of `css`, in hex.
pub fn content_hash(css: &str) -> String {
    let hash = blake3::hash(css.as_bytes());
    hash.to_hex().as_str()[..HASH_LENGTH].to_string()
}

/// Builds the output file name: the target's base name with every `.css`
/// removed, the hash if any, and `css`, joined by dots, in the target's
/// directory.
pub fn output_path(target: &Utf8Path, hash: Option<&str>) -> Utf8PathBuf {
    let dir = target.parent().unwrap_or(Utf8Path::new(""));
    let base = target.file_name().unwrap_or("").replace(".css", "");

    let name = [Some(base.as_str()), hash, Some("css")]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    dir.join(name)
}

fn print_timings(timings: &Timings, file_count: usize) {
    eprintln!("=== svelte-prune-css timings ===");
    eprintln!("file scan: {:?} ({} files)", timings.scan, file_count);
    eprintln!("collect: {:?}", timings.collect);
    eprintln!("prune: {:?}", timings.prune);
    eprintln!("minify: {:?}", timings.minify);
    eprintln!("total: {:?}", timings.total);
}

/// Runs in watch mode.
async fn run_watch_mode(options: &Options) -> Result<RunReport, OrchestratorError> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};

    println!("Starting watch mode...\n");

    // Initial run
    if let Err(e) = run_once(options) {
        eprintln!("Error: {}", e);
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    watcher
        .watch(options.workspace.as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    println!("Watching for changes... (Ctrl+C to stop)\n");

    while let Some(event) = rx.recv().await {
        let relevant = event.paths.iter().any(|p| {
            Utf8Path::from_path(p).is_some_and(|p| is_watched(options, p))
        });

        if relevant {
            if !options.preserve_watch_output {
                // Clear screen
                print!("\x1B[2J\x1B[1;1H");
            }

            println!("File changed, pruning again...\n");

            if let Err(e) = run_once(options) {
                eprintln!("Error: {}", e);
            }
        }
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

/// Returns true if a change to `path` affects the output.
fn is_watched(options: &Options, path: &Utf8Path) -> bool {
    if path == options.input.as_path() {
        return true;
    }
    let relative = path.strip_prefix(&options.workspace).unwrap_or(path);
    options.include.is_match(relative.as_str()) && !options.ignore.is_match(relative.as_str())
}
