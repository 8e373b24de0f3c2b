use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn cite_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push(format!("cite{}", std::env::consts::EXE_SUFFIX));
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    // Create a file to cite
    let src_dir = root.join("src");
    fs::create_dir_all(&src_dir).unwrap();
    fs::write(src_dir.join("a.txt"), "adapted content\n").unwrap();

    (tmp, root)
}

fn run_cite(project: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = cite_binary();
    let output = Command::new(&binary)
        .arg("--project")
        .arg(project)
        .args(args)
        .current_dir(project)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cite binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn read_document(project: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(project.join("citations.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_add_source_writes_document() {
    let (_tmp, root) = setup_test_env();

    let (stdout, stderr, success) = run_cite(
        &root,
        &[
            "add-source",
            "lib-x",
            "Library X",
            "--url",
            "https://example.com",
            "--license",
            "MIT",
        ],
    );
    assert!(success, "add-source failed: stdout={}, stderr={}", stdout, stderr);

    let doc = read_document(&root);
    assert_eq!(doc["sources"]["lib-x"]["name"], "Library X");
    assert_eq!(doc["sources"]["lib-x"]["license_type"], "MIT");
    assert!(doc["sources"]["lib-x"]["author"].is_null());
    assert!(doc["project_info"]["created_at"].is_string());
}

#[test]
fn test_cite_relative_and_absolute_share_key() {
    let (_tmp, root) = setup_test_env();
    run_cite(&root, &["add-source", "s", "Source"]);

    let abs = root.join("src").join("a.txt");
    let (_, stderr, success) = run_cite(&root, &["cite", abs.to_str().unwrap(), "s"]);
    assert!(success, "cite failed: {}", stderr);
    let (_, stderr, success) = run_cite(&root, &["cite", "./src/a.txt", "s", "--start", "5"]);
    assert!(success, "cite failed: {}", stderr);

    let doc = read_document(&root);
    let files = doc["file_citations"].as_object().unwrap();
    assert_eq!(files.len(), 1);
    let cites = files["src/a.txt"].as_array().unwrap();
    assert_eq!(cites.len(), 2);
    assert!(cites[0].get("line_start").is_none());
    assert_eq!(cites[1]["line_start"], 5);
}

#[test]
fn test_markdown_report_scenario() {
    let (_tmp, root) = setup_test_env();

    run_cite(
        &root,
        &[
            "add-source",
            "lib-x",
            "Library X",
            "--url",
            "https://example.com",
            "--license",
            "MIT",
        ],
    );
    run_cite(
        &root,
        &[
            "cite",
            "src/a.txt",
            "lib-x",
            "--lines",
            "10-20",
            "--comment",
            "adapted snippet",
        ],
    );

    let (stdout, stderr, success) = run_cite(&root, &["report"]);
    assert!(success, "report failed: {}", stderr);
    assert!(stdout.contains("### Library X"));
    assert!(stdout.contains("**License:** MIT"));
    assert!(stdout.contains("### src/a.txt"));
    assert!(stdout.contains("- Uses: Library X (lines 10-20)\n  - Note: adapted snippet"));
}

#[test]
fn test_unknown_source_renders_placeholder() {
    let (_tmp, root) = setup_test_env();
    run_cite(&root, &["add-source", "real", "Real Source"]);

    let (_, stderr, success) = run_cite(&root, &["cite", "src/a.txt", "ghost"]);
    assert!(success, "citing an unregistered source should succeed: {}", stderr);

    let (stdout, _, success) = run_cite(&root, &["report"]);
    assert!(success);
    assert!(stdout.contains("- Uses: Unknown (ghost)"));

    let (stdout, _, success) = run_cite(&root, &["comment", "ghost"]);
    assert!(success);
    assert!(stdout.contains("Unknown source (ghost)"));
}

#[test]
fn test_export_writes_default_report() {
    let (_tmp, root) = setup_test_env();
    run_cite(&root, &["add-source", "s", "Test Source"]);
    run_cite(&root, &["cite", "src/a.txt", "s"]);

    let (stdout, stderr, success) = run_cite(&root, &["export"]);
    assert!(success, "export failed: {}", stderr);
    assert!(stderr.contains("Exported 1 sources, 1 citations"));

    let report = root.join("CITATIONS.md");
    assert_eq!(stdout.trim(), report.display().to_string());
    let content = fs::read_to_string(report).unwrap();
    assert!(content.starts_with("# Project Citations"));
    assert!(content.contains("Test Source"));
}

#[test]
fn test_export_failure_exits_nonzero() {
    let (_tmp, root) = setup_test_env();
    fs::create_dir_all(root.join("CITATIONS.md")).unwrap();

    let (_, stderr, success) = run_cite(&root, &["export"]);
    assert!(!success);
    assert!(stderr.contains("Failed to update citations"));
}

#[test]
fn test_header_uses_extension_style() {
    let (_tmp, root) = setup_test_env();
    run_cite(&root, &["add-source", "s", "Source", "--author", "Someone"]);
    run_cite(&root, &["cite", "src/lib.rs", "s"]);

    let (stdout, _, success) = run_cite(&root, &["header", "src/lib.rs"]);
    assert!(success);
    assert!(stdout.starts_with("/*"));
    assert!(stdout.contains(" *   Author: Someone"));

    let (stdout, _, success) = run_cite(&root, &["header", "src/uncited.py"]);
    assert!(success);
    assert_eq!(stdout.trim(), "# No recorded attributions for this file.");
}

#[test]
fn test_corrupt_document_recovers() {
    let (_tmp, root) = setup_test_env();
    fs::write(root.join("citations.json"), "this is not json").unwrap();

    let (_, stderr, success) = run_cite(&root, &["add-source", "s", "Source"]);
    assert!(success, "add-source after corruption failed: {}", stderr);
    assert!(stderr.contains("corrupted"), "expected a warning, got: {}", stderr);

    let doc = read_document(&root);
    assert_eq!(doc["sources"]["s"]["name"], "Source");
}

#[test]
fn test_config_overrides_report_and_style() {
    let (_tmp, root) = setup_test_env();
    fs::write(
        root.join("cite.toml"),
        "[report]\noutput = \"docs/THIRD_PARTY.md\"\n\n[comments]\nstyle = \"slash\"\n",
    )
    .unwrap();
    run_cite(&root, &["add-source", "s", "Source"]);

    let (stdout, _, success) = run_cite(&root, &["comment", "s"]);
    assert!(success);
    assert_eq!(stdout.trim(), "// Attribution: Source");

    let (_, stderr, success) = run_cite(&root, &["export"]);
    assert!(success, "export failed: {}", stderr);
    assert!(root.join("docs").join("THIRD_PARTY.md").exists());
}

#[test]
fn test_invalid_config_fails() {
    let (_tmp, root) = setup_test_env();
    fs::write(root.join("cite.toml"), "[comments]\nstyle = \"semicolon\"\n").unwrap();

    let (_, stderr, success) = run_cite(&root, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("comments.style"));
}

#[test]
fn test_explicit_config_must_exist() {
    let (_tmp, root) = setup_test_env();
    let missing = root.join("custom.toml");

    let (_, stderr, success) = run_cite(
        &root,
        &["--config", missing.to_str().unwrap(), "stats"],
    );
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));

    // The implicit project config is still optional.
    let (_, stderr, success) = run_cite(&root, &["stats"]);
    assert!(success, "stats without cite.toml failed: {}", stderr);
}

#[test]
fn test_sources_and_stats() {
    let (_tmp, root) = setup_test_env();
    run_cite(&root, &["add-source", "used", "Used Source", "--license", "MIT"]);
    run_cite(&root, &["add-source", "idle", "Idle Source"]);
    run_cite(&root, &["cite", "src/a.txt", "used", "ghost"]);

    let (stdout, _, success) = run_cite(&root, &["sources"]);
    assert!(success);
    assert!(stdout.contains("Used Source"));
    assert!(stdout.contains("(unregistered)"));

    let (stdout, _, success) = run_cite(&root, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Sources:     2"));
    assert!(stdout.contains("Citations:   1"));
    assert!(stdout.contains("ghost"));
    assert!(stdout.contains("idle"));
}

#[test]
fn test_show_lists_citations_in_order() {
    let (_tmp, root) = setup_test_env();
    run_cite(&root, &["add-source", "s", "Source"]);
    run_cite(&root, &["cite", "src/a.txt", "s", "--comment", "first"]);
    run_cite(&root, &["cite", "src/a.txt", "s", "--comment", "second"]);

    let (stdout, _, success) = run_cite(&root, &["show", "src/a.txt"]);
    assert!(success);
    let first = stdout.find("first").unwrap();
    let second = stdout.find("second").unwrap();
    assert!(first < second);
}

#[test]
fn test_cite_requires_source_id() {
    let (_tmp, root) = setup_test_env();
    let (_, _, success) = run_cite(&root, &["cite", "src/a.txt"]);
    assert!(!success);
}
