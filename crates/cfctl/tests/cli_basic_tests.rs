use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test command isolated from the caller's configuration
fn cf() -> Command {
    let mut cmd = Command::cargo_bin("cf").unwrap();
    cmd.env_remove("CF_ACCESS_TOKEN")
        .env_remove("CF_CONFIG_FILE")
        .env_remove("CF_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

fn cf_with_config(dir: &TempDir) -> Command {
    let mut cmd = cf();
    cmd.arg("--config-file").arg(dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_help_flag() {
    cf().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage service instances"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_help_short_flag() {
    cf().arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    cf().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cf"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command() {
    cf().arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "cf {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json() {
    cf().args(["version", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn test_invalid_subcommand_is_incorrect_usage() {
    cf().arg("invalid-command")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Incorrect Usage"));
}

#[test]
fn test_missing_argument_prints_command_help() {
    cf().arg("delete-service")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Incorrect Usage"))
        .stdout(predicate::str::contains("Delete a service instance"));
}

#[test]
fn test_wait_timeout_requires_wait() {
    cf().args(["delete-service", "my-db", "--wait-timeout", "10"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Incorrect Usage"));
}

#[test]
fn test_invalid_output_format() {
    cf().args(["services", "--output", "invalid"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_service_commands_in_help() {
    cf().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create-service"))
        .stdout(predicate::str::contains("delete-orphaned-routes"))
        .stdout(predicate::str::contains("unbind-route-service"));
}

#[test]
fn test_delete_service_help_shows_wait_flags() {
    cf().args(["delete-service", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--wait"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_completions_bash() {
    cf().args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_cf"));
}

#[test]
fn test_completions_zsh() {
    cf().args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef cf"));
}

// ============================================================================
// Profiles
// ============================================================================

#[test]
fn test_profile_list_empty() {
    let dir = TempDir::new().unwrap();
    cf_with_config(&dir)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles configured."));
}

#[test]
fn test_profile_path_uses_explicit_config() {
    let dir = TempDir::new().unwrap();
    cf_with_config(&dir)
        .args(["profile", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_profile_set_then_show_redacts_token() {
    let dir = TempDir::new().unwrap();
    cf_with_config(&dir)
        .args([
            "profile",
            "set",
            "dev",
            "--api-url",
            "https://api.example.com",
            "--username",
            "admin",
            "--token",
            "super-secret-token-value",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'dev' saved successfully."))
        .stdout(predicate::str::contains("Set as default profile."));

    cf_with_config(&dir)
        .args(["profile", "show", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.example.com"))
        .stdout(predicate::str::contains("supe...alue"))
        .stdout(predicate::str::contains("super-secret-token-value").not());
}

#[test]
fn test_profile_list_json() {
    let dir = TempDir::new().unwrap();
    cf_with_config(&dir)
        .args([
            "profile",
            "set",
            "dev",
            "--api-url",
            "https://api.example.com",
            "--username",
            "admin",
            "--token",
            "t",
        ])
        .assert()
        .success();

    let output = cf_with_config(&dir)
        .args(["profile", "list", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["count"], 1);
    assert_eq!(json["profiles"][0]["name"], "dev");
    assert_eq!(json["profiles"][0]["is_default"], true);
}

#[test]
fn test_profile_show_missing_fails() {
    let dir = TempDir::new().unwrap();
    cf_with_config(&dir)
        .args(["profile", "show", "nope"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("Profile 'nope' not found"));
}

#[test]
fn test_profile_remove_declined() {
    let dir = TempDir::new().unwrap();
    cf_with_config(&dir)
        .args([
            "profile",
            "set",
            "dev",
            "--api-url",
            "https://api.example.com",
            "--username",
            "admin",
            "--token",
            "t",
        ])
        .assert()
        .success();

    cf_with_config(&dir)
        .args(["profile", "remove", "dev"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile removal cancelled."));

    cf_with_config(&dir)
        .args(["profile", "remove", "dev", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'dev' removed."));
}

#[test]
fn test_command_without_profile_fails() {
    let dir = TempDir::new().unwrap();
    cf_with_config(&dir)
        .arg("services")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("No profile configured"));
}

#[test]
fn test_corrupt_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "not = [valid").unwrap();
    cf_with_config(&dir)
        .arg("services")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}
