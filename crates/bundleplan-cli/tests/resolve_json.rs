//! Integration tests for `bundleplan resolve`.

use bundleplan_core::BuildPlan;
use serial_test::serial;
use std::process::{Command, Output};
use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "bundleplan-cli", "--bin", "bundleplan", "--"]);
    // Keep the caller's environment out of the plan.
    cmd.env_remove("NODE_ENV")
        .env_remove("PORT")
        .env_remove("BUNDLEPLAN_OUT");
    cmd
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

#[test]
#[serial]
fn test_resolve_json_defaults_to_development() {
    let dir = tempdir().unwrap();

    let output = cargo_bin()
        .args(["--json", "resolve", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    let json = stdout_json(&output);

    assert_eq!(json["schemaVersion"], 1);
    assert_eq!(json["mode"], "development");
    assert_eq!(json["devServer"]["port"], 8080);

    let passes: Vec<&str> = json["plugins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["pass"].as_str().unwrap())
        .collect();
    assert_eq!(passes, vec!["no-emit-on-errors", "define", "html"]);
}

#[test]
#[serial]
fn test_resolve_json_production_from_node_env() {
    let dir = tempdir().unwrap();

    let output = cargo_bin()
        .env("NODE_ENV", "production")
        .args(["--json", "resolve", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    let json = stdout_json(&output);

    assert_eq!(json["mode"], "production");
    let plugins = json["plugins"].as_array().unwrap();
    let last = plugins.last().unwrap();
    assert_eq!(last["pass"], "minify");
    assert_eq!(last["compress"]["drop_console"], true);
    assert_eq!(last["compress"]["keep_fargs"], false);
    assert_eq!(json["rules"][5]["chain"][0]["loader"], "file-loader");
}

#[test]
#[serial]
fn test_resolve_port_from_env_and_flag() {
    let dir = tempdir().unwrap();

    let output = cargo_bin()
        .env("PORT", "9999")
        .args(["--json", "resolve", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    assert_eq!(stdout_json(&output)["devServer"]["port"], 9999);

    let output = cargo_bin()
        .env("PORT", "9999")
        .args(["--json", "resolve", "--port", "4000", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    assert_eq!(stdout_json(&output)["devServer"]["port"], 4000);
}

#[test]
#[serial]
fn test_resolve_reads_env_files() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "PORT=7000\n").unwrap();
    std::fs::write(dir.path().join(".env.development.local"), "PORT=7001\n").unwrap();

    let output = cargo_bin()
        .args(["--json", "resolve", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    assert_eq!(stdout_json(&output)["devServer"]["port"], 7001);

    let output = cargo_bin()
        .args(["--json", "--no-env-files", "resolve", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    assert_eq!(stdout_json(&output)["devServer"]["port"], 8080);
}

#[test]
#[serial]
fn test_resolve_out_writes_plan_file() {
    let dir = tempdir().unwrap();

    let output = cargo_bin()
        .args(["--json", "resolve", "--mode", "production"])
        .args(["--out", "plan/build-plan.json", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    let json = stdout_json(&output);

    assert_eq!(json["ok"], true);
    assert_eq!(json["mode"], "production");
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);

    let written = std::fs::read_to_string(dir.path().join("plan/build-plan.json")).unwrap();
    let plan: BuildPlan = serde_json::from_str(&written).expect("plan file should deserialize");
    assert!(plan.plugins.minify().is_some());
    assert_eq!(plan.fingerprint().unwrap(), json["fingerprint"].as_str().unwrap());
}

#[test]
#[serial]
fn test_invalid_port_is_not_an_error() {
    let dir = tempdir().unwrap();

    let output = cargo_bin()
        .env("PORT", "not-a-port")
        .args(["--json", "resolve", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("Failed to run resolve");
    let json = stdout_json(&output);

    assert_eq!(json["devServer"]["port"], 8080);
    assert_eq!(json["notes"].as_array().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_version_json() {
    let output = cargo_bin()
        .args(["--json", "version"])
        .output()
        .expect("Failed to run version");
    let json = stdout_json(&output);
    assert!(json["version"].is_string());
    assert_eq!(json["plan_schema_version"], 1);
}
