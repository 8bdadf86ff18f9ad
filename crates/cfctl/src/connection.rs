//! Session construction from the loaded configuration

use std::path::PathBuf;

use anyhow::Context;
use cfctl_core::{Config, Profile, Session};
use tracing::{debug, info, trace};

use crate::error::Result as CliResult;

/// Environment variable overriding the profile's bearer token
const ACCESS_TOKEN_ENV: &str = "CF_ACCESS_TOKEN";

/// Owns the loaded configuration and builds per-invocation sessions
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Persist `config` to wherever this manager's configuration came from
    pub fn save_config(&self, config: &Config) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Resolve the active profile's name and settings
    pub fn resolve_profile(&self, profile_name: Option<&str>) -> CliResult<(String, &Profile)> {
        let name = self.config.resolve_profile(profile_name)?;
        let profile = self.config.profile(&name)?;
        Ok((name, profile))
    }

    /// Build the session for this invocation
    ///
    /// When --config-file is explicitly specified, environment variables are
    /// ignored so an isolated config is used exactly as written.
    pub fn session(&self, profile_name: Option<&str>) -> CliResult<Session> {
        let (name, profile) = self.resolve_profile(profile_name)?;
        info!("Using profile: {}", name);

        let use_env_vars = self.config_path.is_none();
        if !use_env_vars {
            debug!("--config-file specified explicitly, ignoring environment variables");
        }

        let env_token = if use_env_vars {
            std::env::var(ACCESS_TOKEN_ENV).ok()
        } else {
            None
        };
        if env_token.is_some() {
            debug!("Found {} environment variable", ACCESS_TOKEN_ENV);
        }

        trace!("API endpoint: {}", profile.api_url);
        Ok(Session::from_profile(profile, env_token.as_deref())?)
    }
}
