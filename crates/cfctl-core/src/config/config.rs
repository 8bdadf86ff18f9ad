//! Configuration management for the cf CLI
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format with support for multiple named profiles.
//! `${VAR}` references are kept verbatim in the loaded [`Config`] so saving
//! never writes their values back; [`Profile::expanded`] resolves them.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when `--profile` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Polling cadence for asynchronous operations
    #[serde(default)]
    pub polling: PollingConfig,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    /// Platform API endpoint, e.g. `https://api.sys.example.com`
    pub api_url: String,
    /// User name shown in "... as <user>..." lines
    pub username: String,
    /// Bearer token. Supports `${VAR}` expansion.
    pub token: String,
    /// Accept self-signed certificates
    #[serde(default)]
    pub skip_ssl_validation: bool,
    /// Currently targeted org and space
    #[serde(default, skip_serializing_if = "Target::is_empty")]
    pub target: Target,
}

/// Targeted org and space, stored by name and guid
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_guid: Option<String>,
}

impl Profile {
    /// Copy with `${VAR}` / `${VAR:-default}` resolved in the endpoint,
    /// user and token
    pub fn expanded(&self) -> Profile {
        Profile {
            api_url: expand_env_vars(&self.api_url),
            username: expand_env_vars(&self.username),
            token: expand_env_vars(&self.token),
            ..self.clone()
        }
    }
}

impl Target {
    pub fn is_empty(&self) -> bool {
        self.org_guid.is_none() && self.space_guid.is_none()
    }

    /// Target an org, dropping any space from the previous org
    pub fn set_org(&mut self, name: &str, guid: &str) {
        self.org_name = Some(name.to_string());
        self.org_guid = Some(guid.to_string());
        self.space_name = None;
        self.space_guid = None;
    }

    pub fn set_space(&mut self, name: &str, guid: &str) {
        self.space_name = Some(name.to_string());
        self.space_guid = Some(guid.to_string());
    }

    pub fn clear_space(&mut self) {
        self.space_name = None;
        self.space_guid = None;
    }
}

/// Poll cadence and upper bound for waiting on asynchronous operations
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Shortest pause between two job polls
const MIN_INTERVAL_MS: u64 = 10;

impl PollingConfig {
    /// Reject a poll interval that would hit the API without pausing
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms < MIN_INTERVAL_MS {
            return Err(ConfigError::InvalidPolling {
                key: "interval_ms",
                reason: format!(
                    "{} is below the minimum of {} ms",
                    self.interval_ms, MIN_INTERVAL_MS
                ),
            });
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_interval_ms() -> u64 {
    3000
}

fn default_timeout_secs() -> u64 {
    900
}

impl Config {
    /// Resolve the profile to use for this invocation
    ///
    /// Explicit `--profile` wins, then `default_profile`, then the first
    /// profile by name.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(profile_name) = explicit_profile {
            return Ok(profile_name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        let mut names: Vec<_> = self.profiles.keys().collect();
        names.sort();
        names
            .first()
            .map(|name| name.to_string())
            .ok_or(ConfigError::NoProfiles)
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Mutable lookup, used when re-targeting
    pub fn profile_mut(&mut self, name: &str) -> Result<&mut Profile> {
        self.profiles
            .get_mut(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Read {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        config.polling.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::Write {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, `~/.config/cfctl/config.toml` is preferred when it exists,
    /// falling back to `~/Library/Application Support/...`.
    ///
    /// On Linux: ~/.config/cfctl/config.toml
    /// On Windows: %APPDATA%\cfctl\cfctl\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("cfctl")
                    .join("config.toml");

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("io", "cfctl", "cfctl").ok_or(ConfigError::NoConfigDir)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}

/// Expand environment variables in a configuration value
///
/// Supports ${VAR} and ${VAR:-default}. Unset variables are left as-is.
fn expand_env_vars(value: &str) -> String {
    let expanded = shellexpand::env_with_context_no_errors(value, |var| std::env::var(var).ok());
    expanded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(api_url: &str) -> Profile {
        Profile {
            api_url: api_url.to_string(),
            username: "admin".to_string(),
            token: "token".to_string(),
            skip_ssl_validation: false,
            target: Target::default(),
        }
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        let mut dev = profile("https://api.dev.example.com");
        dev.target.set_org("my-org", "org-guid");
        dev.target.set_space("my-space", "space-guid");
        config.set_profile("dev".to_string(), dev.clone());
        config.default_profile = Some("dev".to_string());

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.default_profile.as_deref(), Some("dev"));
        assert_eq!(deserialized.profiles["dev"], dev);
        assert_eq!(deserialized.polling, PollingConfig::default());
    }

    #[test]
    fn test_resolve_profile_order() {
        let mut config = Config::default();
        config.set_profile("zeta".to_string(), profile("https://z"));
        config.set_profile("alpha".to_string(), profile("https://a"));

        assert_eq!(config.resolve_profile(None).unwrap(), "alpha");

        config.default_profile = Some("zeta".to_string());
        assert_eq!(config.resolve_profile(None).unwrap(), "zeta");
        assert_eq!(config.resolve_profile(Some("other")).unwrap(), "other");
    }

    #[test]
    fn test_resolve_profile_empty() {
        let config = Config::default();
        let err = config.resolve_profile(None).unwrap_err();
        assert!(err.to_string().contains("cf profile set"));
    }

    #[test]
    fn test_set_org_clears_space() {
        let mut target = Target::default();
        target.set_org("org-a", "guid-a");
        target.set_space("space-a", "sguid-a");
        target.set_org("org-b", "guid-b");

        assert_eq!(target.org_name.as_deref(), Some("org-b"));
        assert!(target.space_guid.is_none());
        assert!(target.space_name.is_none());
    }

    #[test]
    fn test_remove_profile_clears_default() {
        let mut config = Config::default();
        config.set_profile("dev".to_string(), profile("https://d"));
        config.default_profile = Some("dev".to_string());

        assert!(config.remove_profile("dev").is_some());
        assert!(config.default_profile.is_none());
    }

    #[test]
    fn test_polling_defaults() {
        let polling = PollingConfig::default();
        assert_eq!(polling.interval(), Duration::from_secs(3));
        assert_eq!(polling.timeout(), Duration::from_secs(900));
        assert!(polling.validate().is_ok());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let polling = PollingConfig {
            interval_ms: 0,
            timeout_secs: 60,
        };
        let err = polling.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid [polling] interval_ms: 0 is below the minimum of 10 ms"
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_expansion() {
        unsafe {
            std::env::set_var("CFCTL_TEST_TOKEN", "secret-token");
        }

        let mut dev = profile("https://api.example.com");
        dev.token = "${CFCTL_TEST_TOKEN}".to_string();
        let expanded = dev.expanded();

        unsafe {
            std::env::remove_var("CFCTL_TEST_TOKEN");
        }
        assert_eq!(expanded.token, "secret-token");
        assert_eq!(dev.token, "${CFCTL_TEST_TOKEN}");
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_expansion_with_defaults() {
        unsafe {
            std::env::remove_var("CFCTL_UNSET_VAR");
        }

        let dev = profile("${CFCTL_UNSET_VAR:-https://api.fallback.example.com}");
        assert_eq!(dev.expanded().api_url, "https://api.fallback.example.com");
        assert_eq!(expand_env_vars("${CFCTL_UNSET_VAR}"), "${CFCTL_UNSET_VAR}");
    }

    #[test]
    #[serial_test::serial]
    fn test_save_keeps_env_references() {
        unsafe {
            std::env::set_var("CFCTL_SAVE_TOKEN", "plaintext-value");
        }

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[profiles.dev]
api_url = "https://api.example.com"
username = "admin"
token = "${CFCTL_SAVE_TOKEN}"
"#,
        )
        .unwrap();

        let mut config = Config::load_from_path(&path).unwrap();
        config
            .profile_mut("dev")
            .unwrap()
            .target
            .set_org("my-org", "org-guid");
        config.save_to_path(&path).unwrap();

        unsafe {
            std::env::remove_var("CFCTL_SAVE_TOKEN");
        }
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("${CFCTL_SAVE_TOKEN}"));
        assert!(!saved.contains("plaintext-value"));
        assert!(saved.contains("org-guid"));
    }
}
