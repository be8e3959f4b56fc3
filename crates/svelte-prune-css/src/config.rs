//! Configuration loading.
//!
//! Options are resolved from the command line first, then from the config
//! file, then from built-in defaults.

use crate::cli::{Args, OutputFormat};
use crate::orchestrator::output_path;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Config file looked up in the workspace when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "svelte-prune-css.json";

/// Component glob used when neither the CLI nor the config file names one.
pub const DEFAULT_INCLUDE: &str = "src/**/*.svelte";

/// Directories never searched for components.
const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No input stylesheet was given.
    #[error("input is required")]
    MissingInput,

    /// The config file could not be read.
    #[error("failed to read config file {path}: {message}")]
    ReadFailed { path: Utf8PathBuf, message: String },

    /// The config file is not valid JSON or has wrong field types.
    #[error("invalid config file {path}: {message}")]
    Invalid { path: Utf8PathBuf, message: String },

    /// A glob pattern did not compile.
    #[error("invalid glob pattern {pattern:?}: {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Watch mode would write its output over the input stylesheet.
    #[error("watch mode would overwrite the input stylesheet {0}; set a different output or enable hashing")]
    WatchOverwritesInput(Utf8PathBuf),
}

/// The `svelte-prune-css.json` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Stylesheet to prune.
    #[serde(default)]
    pub input: Option<Utf8PathBuf>,

    /// Output location.
    #[serde(default)]
    pub output: Option<Utf8PathBuf>,

    /// Component globs.
    #[serde(default)]
    pub include: Vec<String>,

    /// Extra ignore globs.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Content hash in the output name.
    #[serde(default)]
    pub hash: Option<bool>,

    /// Minify the output.
    #[serde(default)]
    pub minify: Option<bool>,

    /// Prune inside conditional groups.
    #[serde(default)]
    pub prune_nested: Option<bool>,
}

impl FileConfig {
    /// Loads a config file. Comments are allowed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_owned(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Utf8Path, content: &str) -> Result<Self, ConfigError> {
        let content = remove_json_comments(content);
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_owned(),
            message: e.to_string(),
        })
    }
}

/// Fully resolved run options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Absolute project root.
    pub workspace: Utf8PathBuf,
    /// Stylesheet to prune.
    pub input: Utf8PathBuf,
    /// Output location before hashing.
    pub output: Utf8PathBuf,
    /// Component globs, matched against workspace-relative paths.
    pub include: GlobSet,
    /// Ignore globs, matched against workspace-relative paths.
    pub ignore: GlobSet,
    /// Content hash in the output name.
    pub hash: bool,
    /// Minify the output.
    pub minify: bool,
    /// Prune inside conditional groups.
    pub prune_nested: bool,
    /// Report format.
    pub format: OutputFormat,
    /// Report without writing.
    pub dry_run: bool,
    /// Watch mode.
    pub watch: bool,
    /// Keep previous watch output on screen.
    pub preserve_watch_output: bool,
    /// Print phase timings.
    pub timings: bool,
}

impl Options {
    /// Resolves options from the command line and the config file.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let workspace = if args.workspace.is_relative() {
            std::env::current_dir()
                .map(|p| Utf8PathBuf::try_from(p).unwrap_or_default())
                .unwrap_or_default()
                .join(&args.workspace)
        } else {
            args.workspace.clone()
        };

        let file = match &args.config {
            Some(path) => FileConfig::load(&workspace.join(path))?,
            None => {
                let path = workspace.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    FileConfig::load(&path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Self::merge(args, file, workspace)
    }

    fn merge(args: &Args, file: FileConfig, workspace: Utf8PathBuf) -> Result<Self, ConfigError> {
        let input = args
            .input
            .clone()
            .or(file.input)
            .map(|path| workspace.join(path))
            .ok_or(ConfigError::MissingInput)?;
        let output = args
            .output
            .clone()
            .or(file.output)
            .map(|path| workspace.join(path))
            .unwrap_or_else(|| input.clone());

        let include = if !args.include.is_empty() {
            args.include.clone()
        } else if !file.include.is_empty() {
            file.include
        } else {
            vec![DEFAULT_INCLUDE.to_string()]
        };
        let ignore = DEFAULT_IGNORE
            .iter()
            .map(|pattern| pattern.to_string())
            .chain(file.ignore)
            .chain(args.ignore.iter().cloned())
            .collect::<Vec<_>>();

        let hash = !args.no_hash && file.hash.unwrap_or(true);
        if args.watch && !hash && output_path(&output, None) == input {
            return Err(ConfigError::WatchOverwritesInput(input));
        }

        Ok(Self {
            workspace,
            input,
            output,
            include: build_glob_set(&include)?,
            ignore: build_glob_set(&ignore)?,
            hash,
            minify: !args.no_minify && file.minify.unwrap_or(true),
            prune_nested: args.prune_nested || file.prune_nested.unwrap_or(false),
            format: args.format,
            dry_run: args.dry_run,
            watch: args.watch,
            preserve_watch_output: args.preserve_watch_output,
            timings: args.timings,
        })
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Removes JSON comments (for config files).
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '"' => in_string = false,
                '\\' => result.extend(chars.next()),
                _ => {}
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                result.push(c);
                in_string = true;
            }
            ('/', Some('/')) => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.next_if_eq(&'/').is_some() {
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("svelte-prune-css").chain(extra.iter().copied()))
    }

    fn workspace() -> Utf8PathBuf {
        Utf8PathBuf::from("/project")
    }

    #[test]
    fn test_remove_comments() {
        let json = r#"{
            // This is a comment
            "input": "src/a//b.css", /* inline comment */
            "hash": false
        }"#;

        let cleaned = remove_json_comments(json);
        assert!(!cleaned.contains("This is"));
        assert!(!cleaned.contains("inline"));
        assert!(cleaned.contains("\"src/a//b.css\""));
    }

    #[test]
    fn test_parse_camel_case_file() {
        let config = FileConfig::parse(
            Utf8Path::new("svelte-prune-css.json"),
            r#"{ "input": "src/app.css", "pruneNested": true, "minify": false, "include": ["lib/**/*.svelte"] }"#,
        )
        .expect("valid config");
        assert_eq!(config.input, Some(Utf8PathBuf::from("src/app.css")));
        assert_eq!(config.prune_nested, Some(true));
        assert_eq!(config.minify, Some(false));
        assert_eq!(config.include, vec!["lib/**/*.svelte"]);
        assert_eq!(config.hash, None);
    }

    #[test]
    fn test_invalid_file_names_path() {
        let err = FileConfig::parse(Utf8Path::new("bad.json"), r#"{ "hash": "yes" }"#)
            .expect_err("hash must be a bool");
        assert!(err.to_string().starts_with("invalid config file bad.json"));
    }

    #[test]
    fn test_missing_input() {
        let err = Options::merge(&args(&[]), FileConfig::default(), workspace())
            .expect_err("input is required");
        assert!(matches!(err, ConfigError::MissingInput));
        assert_eq!(err.to_string(), "input is required");
    }

    #[test]
    fn test_defaults() {
        let options = Options::merge(
            &args(&["--input", "src/global.css"]),
            FileConfig::default(),
            workspace(),
        )
        .expect("valid options");
        assert_eq!(options.input, Utf8PathBuf::from("/project/src/global.css"));
        assert_eq!(options.output, options.input);
        assert!(options.hash);
        assert!(options.minify);
        assert!(!options.prune_nested);
        assert!(options.include.is_match("src/routes/+page.svelte"));
        assert!(!options.include.is_match("lib/Button.svelte"));
        assert!(options.ignore.is_match("src/node_modules/pkg/A.svelte"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            input: Some("from-file.css".into()),
            hash: Some(true),
            minify: Some(true),
            include: vec!["file/**/*.svelte".to_string()],
            ignore: vec!["**/skip/**".to_string()],
            ..FileConfig::default()
        };
        let options = Options::merge(
            &args(&["--input", "cli.css", "--no-hash", "--include", "cli/*.svelte"]),
            file,
            workspace(),
        )
        .expect("valid options");
        assert_eq!(options.input, Utf8PathBuf::from("/project/cli.css"));
        assert!(!options.hash);
        assert!(options.minify);
        assert!(options.include.is_match("cli/A.svelte"));
        assert!(!options.include.is_match("file/A.svelte"));
        assert!(options.ignore.is_match("src/skip/A.svelte"));
    }

    #[test]
    fn test_file_values_apply_without_flags() {
        let file = FileConfig {
            input: Some("src/app.css".into()),
            output: Some("dist/app.css".into()),
            hash: Some(false),
            minify: Some(false),
            prune_nested: Some(true),
            ..FileConfig::default()
        };
        let options = Options::merge(&args(&[]), file, workspace()).expect("valid options");
        assert_eq!(options.output, Utf8PathBuf::from("/project/dist/app.css"));
        assert!(!options.hash);
        assert!(!options.minify);
        assert!(options.prune_nested);
    }

    #[test]
    fn test_invalid_glob() {
        let err = Options::merge(
            &args(&["--input", "a.css", "--include", "src/[.svelte"]),
            FileConfig::default(),
            workspace(),
        )
        .expect_err("unclosed class");
        assert!(matches!(err, ConfigError::InvalidGlob { .. }));
    }

    #[test]
    fn test_watch_refuses_to_overwrite_input() {
        let err = Options::merge(
            &args(&["--input", "src/app.css", "--no-hash", "--watch"]),
            FileConfig::default(),
            workspace(),
        )
        .expect_err("output equals input");
        assert!(matches!(err, ConfigError::WatchOverwritesInput(_)));

        let options = Options::merge(
            &args(&["--input", "src/app.css", "--watch"]),
            FileConfig::default(),
            workspace(),
        );
        assert!(options.is_ok());
    }
}
