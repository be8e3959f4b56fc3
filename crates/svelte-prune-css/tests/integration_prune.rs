//! End-to-end tests for the svelte-prune-css binary.
//!
//! Each test lays out a small project in a temporary directory, runs the
//! binary against it and inspects the written stylesheet and the report.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// TEST INFRASTRUCTURE
// ============================================================================

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_svelte-prune-css"))
}

/// Creates a project from `(relative path, contents)` pairs.
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (path, contents) in files {
        let path = dir.path().join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, contents).expect("write fixture");
    }
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(binary_path())
        .arg("--workspace")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run svelte-prune-css")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Returns the single `global.<hash>.css` file written next to the input.
fn hashed_output(dir: &Path) -> (String, String) {
    let written: Vec<String> = fs::read_dir(dir.join("src"))
        .expect("read src")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("global.") && name != "global.css")
        .collect();
    assert_eq!(written.len(), 1, "written: {:?}", written);
    let name = written[0].clone();
    let css = fs::read_to_string(dir.join("src").join(&name)).expect("read output");
    (name, css)
}

const COMPONENTS: &[(&str, &str)] = &[
    ("src/A.svelte", r#"<div class="a">A</div>"#),
    ("src/B.svelte", r#"<span class="b">B</span>"#),
];

fn with_stylesheet(css: &'static str) -> Vec<(&'static str, &'static str)> {
    let mut files = COMPONENTS.to_vec();
    files.push(("src/global.css", css));
    files
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_unused_top_level_rule_is_removed() {
    let dir = project(&with_stylesheet(
        ".a { color: red }\n.c { color: blue }\n#id { color: green }\n",
    ));
    let output = run(dir.path(), &["--input", "src/global.css"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let (name, css) = hashed_output(dir.path());
    let hash = name
        .strip_prefix("global.")
        .and_then(|rest| rest.strip_suffix(".css"))
        .expect("hashed name");
    assert_eq!(hash.len(), 12);
    assert!(css.contains(".a{"));
    assert!(css.contains("#id{"));
    assert!(!css.contains(".c"));

    let report = stdout(&output);
    assert!(report.contains("Detected 2 classes from 2 Svelte components"));
    assert!(report.contains("Removed 1 class from \"src/global.css\""));
    assert!(report.contains(&format!("> Saved output to \"src/{}\"", name)));
}

#[test]
fn test_media_rule_is_retained() {
    let dir = project(&with_stylesheet(
        "@media (min-width: 600px) { .d { color: red } }\n.a { color: red }\n",
    ));
    let output = run(dir.path(), &["--input", "src/global.css", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json report");
    assert_eq!(report["removed"], serde_json::json!([".d"]));
    assert_eq!(
        report["classes"],
        serde_json::json!([
            { "name": ".a", "origin": "markup" },
            { "name": ".b", "origin": "markup" },
        ])
    );

    let (_, css) = hashed_output(dir.path());
    assert!(css.contains("@media"));
    assert!(css.contains(".d{"));
}

#[test]
fn test_prune_nested_removes_media_rules() {
    let dir = project(&with_stylesheet(
        "@media (min-width: 600px) { .d { color: red } }\n.a { color: red }\n",
    ));
    let output = run(
        dir.path(),
        &["--input", "src/global.css", "--prune-nested", "--no-hash"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let css = fs::read_to_string(dir.path().join("src/global.css")).expect("read output");
    assert!(!css.contains("@media"));
    assert!(css.contains(".a{"));
}

#[test]
fn test_structural_pseudo_class_keeps_rule() {
    let dir = project(&[
        ("src/List.svelte", r#"<li class="e">one</li>"#),
        ("src/global.css", ".e:nth-child(2) { color: red }\n"),
    ]);
    let output = run(dir.path(), &["--input", "src/global.css", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json report");
    assert_eq!(report["removed"], serde_json::json!([]));
    let (_, css) = hashed_output(dir.path());
    assert!(css.contains(".e:nth-child(2)"));
}

// ============================================================================
// OPTIONS
// ============================================================================

#[test]
fn test_missing_input_is_fatal() {
    let dir = project(COMPONENTS);
    let output = run(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: input is required"));
}

#[test]
fn test_component_parse_error_is_fatal() {
    let mut files = with_stylesheet(".a { color: red }\n");
    files.push(("src/Broken.svelte", "<p>ok</p>\n<section>"));
    let dir = project(&files);
    let output = run(dir.path(), &["--input", "src/global.css"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("src/Broken.svelte:2:1"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = project(&with_stylesheet(".a { color: red }\n.c { color: blue }\n"));
    let output = run(dir.path(), &["--input", "src/global.css", "--dry-run"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("> Dry run, output not written to"));

    let entries = fs::read_dir(dir.path().join("src")).expect("read src").count();
    assert_eq!(entries, 3);
}

#[test]
fn test_output_without_hash_or_minification() {
    let dir = project(&with_stylesheet(".a { color: red }\n.c { color: blue }\n"));
    let output = run(
        dir.path(),
        &[
            "--input",
            "src/global.css",
            "--output",
            "dist/site.css",
            "--no-hash",
            "--no-minify",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let css = fs::read_to_string(dir.path().join("dist/site.css")).expect("read output");
    assert!(css.contains(".a {"));
    assert!(css.contains('\n'));
    assert!(!css.contains(".c"));
}

#[test]
fn test_config_file_supplies_options() {
    let mut files = with_stylesheet(".a { color: red }\n.b { color: red }\n");
    files.push(("lib/C.svelte", r#"<p class="from-lib">c</p>"#));
    files.push(("lib/global.css", ".from-lib { color: red }\n.a { color: red }\n"));
    files.push((
        "svelte-prune-css.json",
        r#"{
            // prune the library stylesheet against library components only
            "input": "lib/global.css",
            "include": ["lib/**/*.svelte"],
            "hash": false
        }"#,
    ));
    let dir = project(&files);
    let output = run(dir.path(), &["--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json report");
    assert_eq!(report["componentCount"], 1);
    assert_eq!(report["removed"], serde_json::json!([".a"]));
    assert_eq!(report["output"], "lib/global.css");
}

#[test]
fn test_node_modules_are_ignored() {
    let mut files = with_stylesheet(".a { color: red }\n.vendor { color: red }\n");
    files.push((
        "src/node_modules/pkg/Vendor.svelte",
        r#"<div class="vendor"></div>"#,
    ));
    let dir = project(&files);
    let output = run(dir.path(), &["--input", "src/global.css", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json report");
    assert_eq!(report["componentCount"], 2);
    assert_eq!(report["removed"], serde_json::json!([".vendor"]));
}
