use std::fs;
use std::path::PathBuf;

use cfctl_core::config::{Config, Profile, Target};
use tempfile::TempDir;

/// Returns true if running as root (euid == 0). Used to skip permission tests.
#[cfg(unix)]
fn is_root() -> bool {
    std::process::Command::new("id")
        .arg("-u")
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim() == "0")
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Missing or empty files
// ---------------------------------------------------------------------------

#[test]
fn load_from_nonexistent_path_returns_default_config() {
    let path = PathBuf::from("/tmp/cfctl-test-nonexistent/does/not/exist/config.toml");
    assert!(!path.exists());

    let config = Config::load_from_path(&path).expect("missing file should yield defaults");

    assert!(config.profiles.is_empty());
    assert!(config.default_profile.is_none());
    assert_eq!(config.polling.interval_ms, 3000);
    assert_eq!(config.polling.timeout_secs, 900);
}

#[test]
fn load_empty_config_file_returns_default_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "").unwrap();

    let config = Config::load_from_path(&config_path).expect("empty file should parse as default");

    assert!(config.profiles.is_empty());
    assert!(config.default_profile.is_none());
}

// ---------------------------------------------------------------------------
// Malformed content
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_toml_returns_parse_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[[[broken").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("parse"), "error should mention parsing: {msg}");
}

#[test]
fn load_profile_missing_token_returns_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[profiles.broken]
api_url = "https://api.example.com"
username = "admin"
"#,
    )
    .unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn load_config_with_unknown_fields_ignores_them() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
unknown_top_level_key = "hello"

[profiles.dev]
api_url = "https://api.example.com"
username = "admin"
token = "abc"
totally_unknown_field = true
"#,
    )
    .unwrap();

    let config =
        Config::load_from_path(&config_path).expect("unknown fields should be silently ignored");
    assert!(config.profiles.contains_key("dev"));
}

#[test]
fn partial_polling_section_keeps_other_default() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[polling]\ninterval_ms = 10\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.polling.interval_ms, 10);
    assert_eq!(config.polling.timeout_secs, 900);
}

#[test]
fn zero_poll_interval_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[polling]\ninterval_ms = 0\n").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(err.to_string().contains("interval_ms"));
}

// ---------------------------------------------------------------------------
// Round trip through disk keeps the target
// ---------------------------------------------------------------------------

#[test]
fn saved_target_survives_reload() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("nested").join("config.toml");

    let mut target = Target::default();
    target.set_org("my-org", "org-guid");
    target.set_space("my-space", "space-guid");

    let mut config = Config::default();
    config.set_profile(
        "dev".to_string(),
        Profile {
            api_url: "https://api.example.com".to_string(),
            username: "admin".to_string(),
            token: "abc".to_string(),
            skip_ssl_validation: false,
            target: target.clone(),
        },
    );
    config.default_profile = Some("dev".to_string());
    config.save_to_path(&config_path).unwrap();

    let loaded = Config::load_from_path(&config_path).unwrap();
    assert_eq!(loaded.default_profile.as_deref(), Some("dev"));
    assert_eq!(loaded.profile("dev").unwrap().target, target);
}

// ---------------------------------------------------------------------------
// Permission errors (unix only)
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn load_unreadable_file_returns_clear_error() {
    use std::os::unix::fs::PermissionsExt;

    if is_root() {
        eprintln!("skipping test: running as root");
        return;
    }

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# valid toml").unwrap();
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o000)).unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("load"), "error should reference loading: {msg}");

    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o644)).unwrap();
}

#[cfg(unix)]
#[test]
fn save_to_readonly_directory_returns_clear_error() {
    use std::os::unix::fs::PermissionsExt;

    if is_root() {
        eprintln!("skipping test: running as root");
        return;
    }

    let dir = TempDir::new().unwrap();
    let readonly_dir = dir.path().join("readonly");
    fs::create_dir(&readonly_dir).unwrap();
    fs::set_permissions(&readonly_dir, fs::Permissions::from_mode(0o444)).unwrap();

    let err = Config::default()
        .save_to_path(&readonly_dir.join("config.toml"))
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("save"), "error should reference saving: {msg}");

    fs::set_permissions(&readonly_dir, fs::Permissions::from_mode(0o755)).unwrap();
}
