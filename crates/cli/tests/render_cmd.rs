//! CLI tests for the `tagscript render`, `scan`, and `verb` subcommands.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn tagscript_cmd() -> Command {
    Command::new(cargo::cargo_bin!("tagscript"))
}

fn write_temp_template(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("template.tag");
    fs::write(&path, content).expect("write temp template");
    (dir, path.to_string_lossy().to_string())
}

#[test]
fn render_assignment_and_lookup() {
    let (_dir, path) = write_temp_template("{=(x):5}{x}");
    let output = tagscript_cmd()
        .args(["render", &path])
        .output()
        .expect("run render");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "5");
}

#[test]
fn render_seeded_variable_and_shorthand() {
    let (_dir, path) = write_temp_template("hi {1}, args were: {args}");
    let output = tagscript_cmd()
        .args(["render", &path, "--var", "args=alpha beta"])
        .output()
        .expect("run render");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "hi alpha, args were: alpha beta"
    );
}

#[test]
fn render_stop_template() {
    let (_dir, path) = write_temp_template("before {stop:STOPPED} after");
    let output = tagscript_cmd()
        .args(["render", &path])
        .output()
        .expect("run render");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "before STOPPED"
    );
}

#[test]
fn render_json_envelope() {
    let (_dir, path) = write_temp_template("{=(x):5}{x}");
    let output = tagscript_cmd()
        .args(["--output", "json", "render", &path])
        .output()
        .expect("run render");
    assert!(output.status.success());
    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON envelope");
    assert_eq!(envelope["body"], "5");
    assert_eq!(envelope["variables"]["x"], "5");
}

#[test]
fn render_charlimit_reports_input_too_large() {
    let (_dir, path) = write_temp_template("{=(v):0123456789}{v}{v}{v}");
    let output = tagscript_cmd()
        .args(["render", &path, "--charlimit", "15"])
        .output()
        .expect("run render");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("input too large"),
        "expected workload message, got: {stderr}"
    );
}

#[test]
fn scan_lists_nodes_in_resolution_order() {
    let (_dir, path) = write_temp_template("{a{b}c}");
    let output = tagscript_cmd()
        .args(["--output", "json", "scan", &path])
        .output()
        .expect("run scan");
    assert!(output.status.success());
    let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let coords: Vec<(u64, u64)> = nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| (n["start"].as_u64().unwrap(), n["end"].as_u64().unwrap()))
        .collect();
    assert_eq!(coords, vec![(2, 4), (0, 6)]);
}

#[test]
fn verb_prints_decomposition() {
    let output = tagscript_cmd()
        .args(["--output", "json", "verb", "{name(param):payload}"])
        .output()
        .expect("run verb");
    assert!(output.status.success());
    let verb: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(verb["declaration"], "name");
    assert_eq!(verb["parameter"], "param");
    assert_eq!(verb["payload"], "payload");
}
