//! Unified error handling for cfctl-core
//!
//! Platform responses, operation outcomes and configuration problems all
//! surface as [`CoreError`], with helper predicates so callers can classify
//! an error without matching on every variant.
//!
//! # Example
//!
//! ```rust
//! use cfctl_core::CoreError;
//!
//! let err = CoreError::NotFound {
//!     message: "Service instance not found".to_string(),
//! };
//! assert!(err.is_not_found());
//! assert!(!err.is_timeout());
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::operation::OperationState;

/// Core error type for platform operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Platform returned an error envelope we could not classify further
    #[error("{detail}")]
    Api {
        status: u16,
        title: String,
        detail: String,
    },

    /// Resource does not exist (404)
    #[error("{message}")]
    NotFound { message: String },

    /// Token rejected or insufficient permissions (401/403)
    #[error("{message}")]
    Unauthorized { message: String },

    /// Transport-level failure (connection refused, TLS, malformed body)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform reported the asynchronous job as failed
    #[error("{message}")]
    OperationFailed {
        message: String,
        job_guid: Option<String>,
    },

    /// Gave up waiting for the job to reach a terminal state
    #[error("Timed out waiting for the operation to complete after {} seconds", .0.as_secs())]
    OperationTimeout(Duration),

    /// Attempted to move an operation out of a terminal state
    #[error("Operation on '{resource}' is already {from:?} and cannot become {to:?}")]
    InvalidTransition {
        resource: String,
        from: OperationState,
        to: OperationState,
    },

    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// The session has no org or space targeted
    #[error("No {kind} targeted, use '{hint}' to target {article} {kind}.")]
    NoTarget {
        kind: &'static str,
        article: &'static str,
        hint: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::Http(e) => e.is_timeout(),
            CoreError::OperationTimeout(_) => true,
            _ => false,
        }
    }
}
