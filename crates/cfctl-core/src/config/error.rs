//! Errors raised while reading, writing or querying the config file

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    /// A `[polling]` value outside its allowed range
    #[error("Invalid [polling] {key}: {reason}")]
    InvalidPolling { key: &'static str, reason: String },

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profiles configured. Use 'cf profile set' to create a profile.")]
    NoProfiles,

    #[error("Could not determine the platform's config directory")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
