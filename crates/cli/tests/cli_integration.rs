//! CLI integration tests for the `compgraph` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout
//! content, and stderr content. All tests run from the workspace root so
//! the `fixtures/` and `templates/` directories resolve.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `compgraph` binary, rooted at workspace.
fn compgraph() -> Command {
    let mut cmd = cargo_bin_cmd!("compgraph");
    cmd.current_dir(workspace_root());
    cmd
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    compgraph()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("layout-free markup"));
}

#[test]
fn version_exits_0() {
    compgraph()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("compgraph"));
}

// ──────────────────────────────────────────────
// 2. dot subcommand
// ──────────────────────────────────────────────

#[test]
fn dot_fixture_renders_with_templates() {
    compgraph()
        .args([
            "--templates",
            "templates",
            "dot",
            "fixtures/dot/pipeline.dot",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains(
            "  <text id=\"v0\">source text</text>",
        ))
        .stdout(predicate::str::contains(
            "  <path class=\"edge\" src=\"v0\" dst=\"v1\"/>",
        ))
        .stderr(predicate::str::is_empty());
}

#[test]
fn dot_reads_stdin() {
    compgraph()
        .args(["--templates", "templates", "dot"])
        .write_stdin("digraph G { a -> b; }")
        .assert()
        .success()
        .stdout(predicate::str::contains("<text id=\"v1\">b</text>"));
}

#[test]
fn dot_syntax_error_exits_1_after_writing_partial_graph() {
    compgraph()
        .args([
            "--templates",
            "templates",
            "dot",
            "fixtures/dot/missing_semicolon.dot",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<text id=\"v0\">a</text>"))
        .stderr(predicate::str::contains("parse error: line 3: expected ';'"));
}

#[test]
fn dot_quiet_suppresses_text_diagnostics() {
    compgraph()
        .args([
            "--quiet",
            "--templates",
            "templates",
            "dot",
            "fixtures/dot/missing_semicolon.dot",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::is_empty());
}

#[test]
fn dot_json_diagnostics() {
    let output = compgraph()
        .args([
            "--output",
            "json",
            "dot",
            "--emit",
            "json",
            "fixtures/dot/missing_semicolon.dot",
        ])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let errors: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr should be JSON");
    assert_eq!(errors[0]["stage"], "parse");
    assert_eq!(errors[0]["line"], 3);
}

#[test]
fn dot_emit_json_skips_templates() {
    let dir = TempDir::new().expect("tempdir");
    let output = compgraph()
        .args(["--templates"])
        .arg(dir.path())
        .args(["dot", "--emit", "json", "fixtures/dot/pipeline.dot"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(graph["name"], "pipeline");
    assert_eq!(graph["vertices"].as_array().map(|v| v.len()), Some(7));
    assert_eq!(graph["vertices"][0]["label"], "source text");
}

#[test]
fn dot_truncated_input_reports_real_lines() {
    compgraph()
        .args(["--templates", "templates", "dot"])
        .write_stdin("digraph G {\n a")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "parse error: line 2: expected '}', got end of input",
        ))
        .stderr(predicate::str::contains("line 0").not());
}

#[test]
fn dot_lex_error_diagnostic_is_one_line() {
    let output = compgraph()
        .args(["--templates", "templates", "dot"])
        .write_stdin("digraph G { a - \n b; }")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr
        .lines()
        .all(|l| l.starts_with("lex error:") || l.starts_with("parse error:")));
    assert!(stderr.contains("lex error: line 1: unrecognized input: - \n"));
}

#[test]
fn dot_fail_fast_reports_one_error() {
    compgraph()
        .args([
            "--templates",
            "templates",
            "dot",
            "--fail-fast",
            "fixtures/dot/missing_semicolon.dot",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected ';'").count(1));
}

#[test]
fn dot_minimal_keywords_reject_rankdir_directive() {
    compgraph()
        .args(["--templates", "templates", "dot", "--keywords", "minimal"])
        .write_stdin("digraph G { rankdir=\"LR\"; a; }")
        .assert()
        .code(1);

    compgraph()
        .args(["--templates", "templates", "dot", "--keywords", "extended"])
        .write_stdin("digraph G { rankdir=\"LR\"; a; }")
        .assert()
        .success()
        .stdout(predicate::str::contains("rankdir").not());
}

#[test]
fn dot_missing_templates_exits_1() {
    let dir = TempDir::new().expect("tempdir");
    compgraph()
        .arg("--templates")
        .arg(dir.path())
        .args(["dot", "fixtures/dot/pipeline.dot"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("header.snippet"));
}

#[test]
fn dot_nonexistent_file_exits_1() {
    compgraph()
        .args(["dot", "does/not/exist.dot"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn dot_custom_templates_are_copied_verbatim() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("header.snippet"), "[[HEAD]]").expect("write");
    fs::write(dir.path().join("footer.snippet"), "[[FOOT]]").expect("write");
    compgraph()
        .arg("--templates")
        .arg(dir.path())
        .arg("dot")
        .write_stdin("digraph G { a; }")
        .assert()
        .success()
        .stdout("[[HEAD]]<g class=\"layout\">\n  <text id=\"v0\">a</text>\n\n</g>\n[[FOOT]]");
}

// ──────────────────────────────────────────────
// 3. llvm subcommand
// ──────────────────────────────────────────────

#[test]
fn llvm_fixture_renders_each_function() {
    compgraph()
        .args(["--templates", "templates", "llvm", "fixtures/llvm/loop.ll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>sum</h2>"))
        .stdout(predicate::str::contains("<h2>guard</h2>"))
        .stdout(predicate::str::contains(
            "  <path class=\"edge\" src=\"for.body\" dst=\"for.cond\"/>",
        ))
        .stdout(predicate::str::contains("layoutAll(document);"));
}

#[test]
fn llvm_emit_json() {
    let output = compgraph()
        .args(["llvm", "--emit", "json", "fixtures/llvm/loop.ll"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let functions: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(functions[0]["function"], "sum");
    assert_eq!(functions[1]["terminators"]["entry"], "invoke");
}

#[test]
fn llvm_branch_outside_function_exits_1() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("stray.ll");
    fs::write(&path, "  br label %x\n").expect("write");
    compgraph()
        .args(["--templates", "templates", "llvm"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("outside of a basic block"));
}

#[test]
fn llvm_stray_line_still_renders_functions() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("mixed.ll");
    fs::write(
        &path,
        "  ret void\ndefine void @f() {\nentry:\n  ret void\n}\n",
    )
    .expect("write");
    compgraph()
        .args(["--templates", "templates", "llvm"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("<h2>f</h2>"))
        .stdout(predicate::str::contains("layoutAll(document);"))
        .stderr(predicate::str::contains(
            "extract error: line 1: 'ret' outside of a basic block",
        ));
}

#[test]
fn llvm_requires_file_argument() {
    compgraph().arg("llvm").assert().failure();
}

// ──────────────────────────────────────────────
// 4. tokens subcommand
// ──────────────────────────────────────────────

#[test]
fn tokens_dump_one_per_line() {
    compgraph()
        .arg("tokens")
        .write_stdin("digraph G {\n  a -> \"b\";\n}")
        .assert()
        .success()
        .stdout(predicate::str::contains("1: Keyword(digraph)\n"))
        .stdout(predicate::str::contains("2: ->\n"))
        .stdout(predicate::str::contains("2: Str(\"b\")\n"))
        .stdout(predicate::str::ends_with("3: Eof\n"));
}
