//! Configuration and profile management for the cf CLI
//!
//! Each profile names one platform API endpoint, the credentials to use
//! against it and the org/space currently targeted. Polling cadence for
//! asynchronous operations is configured globally.

#![allow(clippy::module_inception)]

pub mod config;
pub mod error;

pub use config::{Config, PollingConfig, Profile, Target};
pub use error::{ConfigError, Result};
