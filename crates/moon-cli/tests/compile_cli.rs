//! Integration tests for `moonc compile` and `moonc check`.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "moon-cli", "--bin", "moonc", "--"]);
    cmd
}

#[test]
fn test_compile_stdin_to_stdout() {
    let mut child = cargo_bin()
        .args(["compile", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn compile command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"const v = <br/>;")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "const v = Moon.view.components.br({});"
    );
}

#[test]
fn test_compile_writes_next_to_input() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.moon"), "export default <p>hi</p>;").unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["compile", "app.moon"])
        .output()
        .expect("Failed to run compile command");
    assert!(output.status.success());

    let compiled = fs::read_to_string(dir.path().join("app.js")).unwrap();
    assert!(compiled.starts_with("export default Moon.view.components.p("));
}

#[test]
fn test_compile_uses_project_runtime_names() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("moon.json"),
        r#"{"runtime": {"components": "h"}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("app.moon"), "<br/>").unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["compile", "--stdout", "app.moon"])
        .output()
        .expect("Failed to run compile command");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "h.br({})");
}

#[test]
fn test_compile_syntax_error_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.moon"), "<div test=\"/>").unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["compile", "bad.moon"])
        .output()
        .expect("Failed to run compile command");

    assert!(!output.status.success());
    assert!(!dir.path().join("bad.js").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid view syntax"), "stderr: {stderr}");
}

#[test]
fn test_syntax_error_is_reported_once() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.moon"), "<p a=\"/>").unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["check", "bad.moon"])
        .output()
        .expect("Failed to run check command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("invalid view syntax").count(),
        1,
        "stderr: {stderr}"
    );
}

#[test]
fn test_check_json_reports_position() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("good.moon"), "f(<a>x</a>, <b/>)").unwrap();
    fs::write(dir.path().join("bad.moon"), "let a;\nlet b = f({)").unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(dir.path())
        .args(["--json", "check", "good.moon", "bad.moon"])
        .output()
        .expect("Failed to run check command");
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["schema_version"].as_u64(), Some(1));
    assert_eq!(json["command"], "check");
    assert_eq!(json["ok"], false);
    assert_eq!(json["counts"]["failed"].as_u64(), Some(1));

    let good = &json["files"][0];
    assert_eq!(good["ok"], true);
    assert_eq!(good["views"].as_u64(), Some(2));

    let bad = &json["files"][1];
    assert_eq!(bad["ok"], false);
    assert_eq!(bad["error"]["expected"], "\"}\"");
    assert_eq!(bad["error"]["line"].as_u64(), Some(2));
}
