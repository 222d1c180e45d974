//! Integration tests for CLI JSON output behavior
//!
//! These tests verify that --json flag produces valid, parseable JSON output
//! for automation and scripting workflows.

use std::fs;
use std::process::Command;

const KUBECONFIG: &str = r#"apiVersion: v1
kind: Config
clusters:
- name: dev
  cluster:
    server: https://dev.example.com
- name: prod
  cluster:
    server: https://prod.example.com
users:
- name: dev-user
  user:
    token: secret
- name: prod-user
  user:
    token: secret
contexts:
- name: dev
  context:
    cluster: dev
    user: dev-user
    namespace: web
- name: prod
  context:
    cluster: prod
    user: prod-user
current-context: prod
"#;

#[test]
fn test_providers_json_outputs_descriptors() {
    let output = Command::new(env!("CARGO_BIN_EXE_kconnect"))
        .args(["providers", "--json"])
        .output()
        .expect("Failed to execute 'kconnect providers --json'");

    assert!(
        output.status.success(),
        "kconnect providers --json failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let providers: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    let providers = providers.as_array().expect("JSON output should be an array");

    let names: Vec<&str> = providers
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, ["aks", "eks", "empty", "saml"]);

    let eks = &providers[1];
    assert_eq!(eks["kind"], "cluster");
    assert_eq!(eks["identity_providers"], serde_json::json!(["empty", "saml"]));
    let region = eks["flags"]
        .as_array()
        .and_then(|flags| flags.iter().find(|f| f["name"] == "region"))
        .expect("eks should declare --region");
    assert_eq!(region["required"], true);
}

#[test]
fn test_get_contexts_json() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config");
    fs::write(&path, KUBECONFIG).expect("write kubeconfig");

    let output = Command::new(env!("CARGO_BIN_EXE_kconnect"))
        .args(["config", "get-contexts", "--json", "--kubeconfig"])
        .arg(&path)
        .output()
        .expect("Failed to execute 'kconnect config get-contexts --json'");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let contexts: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(
        contexts,
        serde_json::json!([
            {"name": "dev", "cluster": "dev", "user": "dev-user", "namespace": "web", "current": false},
            {"name": "prod", "cluster": "prod", "user": "prod-user", "current": true}
        ])
    );
}

#[test]
fn test_get_contexts_json_missing_file_is_empty() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = Command::new(env!("CARGO_BIN_EXE_kconnect"))
        .args(["config", "get-contexts", "--json", "--kubeconfig"])
        .arg(dir.path().join("absent"))
        .output()
        .expect("Failed to execute kconnect");
    assert!(output.status.success());

    let contexts: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(contexts, serde_json::json!([]));
}
