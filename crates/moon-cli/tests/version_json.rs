//! Integration tests for `moonc version`.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "moon-cli", "--bin", "moonc", "--"]);
    cmd
}

#[test]
fn test_version_human() {
    let output = cargo_bin()
        .arg("version")
        .output()
        .expect("Failed to run version command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("moonc "), "unexpected stdout: {stdout}");
}

#[test]
fn test_version_json() {
    let output = cargo_bin()
        .args(["--json", "version"])
        .output()
        .expect("Failed to run version command");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["schema_version"].as_u64(), Some(1));
    assert_eq!(json["name"], "moonc");
    assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
}
