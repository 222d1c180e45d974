//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.

use std::process::Command;

fn kconnect(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    Command::new(env!("CARGO_BIN_EXE_kconnect"))
        .current_dir(home.path())
        .env("HOME", home.path())
        .env("KCONNECT_CONFIG", home.path().join("missing.toml"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute kconnect")
}

/// Execute 'kconnect providers' and verify it succeeds
fn run_providers() -> std::process::Output {
    let output = kconnect(&["providers"]);

    assert!(
        output.status.success(),
        "kconnect providers failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    output
}

/// Verify that stdout contains only user-facing output (no JSON logs)
#[test]
fn test_providers_stdout_is_clean() {
    let output = run_providers();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    for line in stdout.lines() {
        assert!(
            !line.trim().starts_with('{'),
            "stdout contains JSON line: {}",
            line
        );
    }
}

/// Verify that the provider table lists every built-in provider
#[test]
fn test_providers_table_lists_builtins() {
    let output = run_providers();
    let stdout = String::from_utf8_lossy(&output.stdout);

    for name in ["eks", "aks", "empty", "saml"] {
        assert!(
            stdout.contains(name),
            "expected provider '{}' in output, got: {}",
            name,
            stdout
        );
    }
    assert!(stdout.contains("--region*"));
}

/// Verify that default mode (no flags) suppresses INFO-level logs
#[test]
fn test_default_mode_suppresses_info_logs() {
    let output = run_providers();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should suppress INFO logs, but stderr contains: {}",
        stderr
    );
    assert!(
        !stderr.contains(r#""level":"WARN""#),
        "Default mode should suppress WARN logs, but stderr contains: {}",
        stderr
    );
}

/// Verify verbose mode (-v) emits INFO logs
#[test]
fn test_verbose_flag_emits_info_logs() {
    let output = kconnect(&["-v", "providers"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Verbose mode should emit INFO logs, but stderr is: {}",
        stderr
    );
    assert!(stderr.contains("core.app.startup_completed"));
}

/// Verify verbose flag works when flag is after subcommand (global flag behavior)
#[test]
fn test_verbose_flag_after_subcommand() {
    let output = kconnect(&["providers", "--verbose"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#""level":"INFO""#),
        "--verbose after subcommand should emit INFO logs, but stderr is: {}",
        stderr
    );
}

#[test]
fn test_use_without_provider_fails() {
    let output = kconnect(&["use"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No cluster provider given"),
        "expected missing provider message, got: {}",
        stderr
    );
    assert!(stderr.contains("aks, eks"));
}

#[test]
fn test_use_unknown_provider_names_stage() {
    let output = kconnect(&["use", "gke", "--idp-protocol", "empty"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("setup failed: Unknown cluster provider 'gke'"),
        "expected setup failure, got: {}",
        stderr
    );
}

#[test]
fn test_use_missing_idp_protocol() {
    let output = kconnect(&["use", "eks"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--idp-protocol"), "got: {}", stderr);
}

#[test]
fn test_use_help_shows_provider_options() {
    let output = kconnect(&["use", "eks", "--idp-protocol", "saml", "--help"]);
    assert!(
        output.status.success(),
        "help should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    for option in ["--region", "--region-filter", "--idp-endpoint", "--alias"] {
        assert!(
            stdout.contains(option),
            "expected '{}' in help, got: {}",
            option,
            stdout
        );
    }
}

#[test]
fn test_invalid_config_fails_use() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[providers.gke]\nproject = \"x\"\n").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_kconnect"))
        .current_dir(dir.path())
        .env("KCONNECT_CONFIG", &config)
        .args(["use", "eks", "--idp-protocol", "empty"])
        .output()
        .expect("Failed to execute kconnect");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Could not load config"),
        "expected config error, got: {}",
        stderr
    );
    assert!(stderr.contains("gke"));
}

#[test]
fn test_completions_generate_script() {
    let output = kconnect(&["completions", "bash"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kconnect"));
}
