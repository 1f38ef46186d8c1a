//! CLI integration tests: run the built binary against the fixture tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_rulebook-chunker")
}

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/source")
}

fn run(args: &[&str]) -> Output {
    Command::new(bin()).args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn build_writes_dataset() {
    let out = TempDir::new().unwrap();
    let output = run(&[
        "build",
        "--source",
        fixtures().to_str().unwrap(),
        "--output",
        out.path().to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.contains("Found 4 markdown files"));
    assert!(text.contains("Wrote 14 chunks from 4 files"));

    let dataset = fs::read_to_string(out.path().join("rag_database.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&dataset).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(14));
}

#[test]
fn build_with_archive() {
    let out = TempDir::new().unwrap();
    let archive = out.path().join("pkg/rulebook.zip");
    let output = run(&[
        "build",
        "--source",
        fixtures().to_str().unwrap(),
        "--output",
        out.path().join("dist").to_str().unwrap(),
        "--archive",
        archive.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(archive.is_file());
}

#[test]
fn check_writes_nothing() {
    let out = TempDir::new().unwrap();
    let dist = out.path().join("dist");
    let output = run(&[
        "check",
        "--source",
        fixtures().to_str().unwrap(),
        "--output",
        dist.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Checked 14 chunks from 4 files"));
    assert!(!dist.exists());
}

#[test]
fn check_prints_per_file_report() {
    let output = run(&["check", "--source", fixtures().to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.contains(&"Files"));
    assert!(lines.contains(&"001 gm/npcs.md (3 chunks)"));
    assert!(lines.contains(&"003 public/rules/combat.md (5 chunks)"));
    assert!(lines.contains(&"    Levels: 0, 2"));
    assert!(!text.contains("Found 4 markdown files"));
}

#[test]
fn empty_source_is_notice_not_error() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let dist = out.path().join("dist");
    let output = run(&[
        "build",
        "--source",
        src.path().to_str().unwrap(),
        "--output",
        dist.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No markdown files found"));
    assert!(!dist.join("rag_database.json").exists());
}

#[test]
fn missing_source_fails() {
    let src = TempDir::new().unwrap();
    let output = run(&[
        "build",
        "--source",
        src.path().join("missing").to_str().unwrap(),
    ]);
    assert!(!output.status.success());
}

#[test]
fn gen_config_prints_stock_config() {
    let output = run(&["gen-config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("public_folder = \"public\""));
    assert!(text.contains("label = \"Header1\""));
}
