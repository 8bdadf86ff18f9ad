//! Error types for cf
//!
//! Every failure reaching `main` is rendered as `FAILED` on stdout followed by
//! a diagnostic on stderr, and the process exits 1.

use cfctl_core::{ConfigError, CoreError};
use colored::Colorize;
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: No space targeted, use 'cf target -s SPACE' to target a space.
///
///   tip: List the spaces of the targeted org: cf target -s <space>
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for description in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
        }
    }
}

/// Main error type for the cf application
#[derive(Error, Debug)]
pub enum CfCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'cf profile set' to create a profile.")]
    NoProfileConfigured,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{message}")]
    ApiError { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    OperationFailed {
        message: String,
        job_guid: Option<String>,
    },

    #[error("{message}")]
    Timeout { message: String },

    #[error("{message}")]
    NotTargeted { message: String },

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for cf operations
pub type Result<T> = std::result::Result<T, CfCtlError>;

impl CfCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            CfCtlError::ProfileNotFound { name } => vec![
                "List available profiles: cf profile list".to_string(),
                format!(
                    "Create profile '{}': cf profile set {} --api-url <url> --username <user> --token <token>",
                    name, name
                ),
            ],
            CfCtlError::NoProfileConfigured => vec![
                "Create a profile: cf profile set dev --api-url <url> --username <user> --token <token>"
                    .to_string(),
                "View profile documentation: cf profile --help".to_string(),
            ],
            CfCtlError::AuthenticationFailed { .. } => vec![
                "Check the profile token: cf profile show <profile>".to_string(),
                "Override the token for one invocation with CF_ACCESS_TOKEN".to_string(),
            ],
            CfCtlError::ConnectionError { message }
                if message.contains("certificate") || message.contains("SSL") =>
            {
                vec![
                    "For self-signed certificates: cf profile set <name> ... --skip-ssl-validation"
                        .to_string(),
                ]
            }
            CfCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the API endpoint: cf profile show <profile>".to_string(),
            ],
            CfCtlError::Timeout { .. } => vec![
                "Raise the limit with --wait-timeout or [polling] timeout_secs in the config file"
                    .to_string(),
                "Check progress with: cf services".to_string(),
            ],
            CfCtlError::NotTargeted { .. } => {
                vec!["Show the current target: cf target".to_string()]
            }
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let CfCtlError::OperationFailed {
            job_guid: Some(guid),
            ..
        } = self
        {
            diag = diag.detail(&format!("Job: {}", guid));
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<CoreError> for CfCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api { detail, .. } => CfCtlError::ApiError { message: detail },
            CoreError::NotFound { message } => CfCtlError::NotFound { message },
            CoreError::Unauthorized { message } => CfCtlError::AuthenticationFailed { message },
            CoreError::Http(e) => CfCtlError::ConnectionError {
                message: e.to_string(),
            },
            CoreError::OperationFailed { message, job_guid } => {
                CfCtlError::OperationFailed { message, job_guid }
            }
            e @ CoreError::OperationTimeout(_) => CfCtlError::Timeout {
                message: e.to_string(),
            },
            e @ CoreError::NoTarget { .. } => CfCtlError::NotTargeted {
                message: e.to_string(),
            },
            CoreError::Validation(message) => CfCtlError::InvalidInput { message },
            CoreError::Config(message) => CfCtlError::Config(message),
            e @ CoreError::InvalidTransition { .. } => CfCtlError::ApiError {
                message: e.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CfCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => CfCtlError::ProfileNotFound { name },
            ConfigError::NoProfiles => CfCtlError::NoProfileConfigured,
            other => CfCtlError::Config(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CfCtlError {
    fn from(err: serde_json::Error) -> Self {
        CfCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for CfCtlError {
    fn from(err: std::io::Error) -> Self {
        CfCtlError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for CfCtlError {
    fn from(err: anyhow::Error) -> Self {
        CfCtlError::Config(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_api_error_keeps_platform_detail() {
        let err: CfCtlError = CoreError::Api {
            status: 422,
            title: "CF-UnprocessableEntity".to_string(),
            detail: "The service instance name is taken: my-db".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "The service instance name is taken: my-db");
    }

    #[test]
    fn test_timeout_message() {
        let err: CfCtlError = CoreError::OperationTimeout(Duration::from_secs(900)).into();
        assert_eq!(
            err.to_string(),
            "Timed out waiting for the operation to complete after 900 seconds"
        );
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_no_profiles_maps_to_no_profile_configured() {
        let err: CfCtlError = ConfigError::NoProfiles.into();
        assert!(matches!(err, CfCtlError::NoProfileConfigured));
    }

    #[test]
    fn test_unauthorized_has_tips() {
        let err: CfCtlError = CoreError::Unauthorized {
            message: "Invalid Auth Token".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Authentication failed: Invalid Auth Token");
        assert_eq!(err.suggestions().len(), 2);
    }
}
