//! # cfctl-core
//!
//! Shared engine for the `cf` platform CLI.
//!
//! - **Config** - TOML profiles (API endpoint, credentials, target) and
//!   polling settings
//! - **Client** - authenticated platform HTTP client and typed endpoints
//! - **Operations** - the asynchronous-operation contract: submit a
//!   mutation, classify the platform's answer, and optionally poll the job
//!   until it reaches a terminal state
//! - **Session** - explicit per-invocation context handed to every command
//!
//! ## Asynchronous operations
//!
//! ```text
//!             submit()
//!                |
//!     +----------+-----------+
//!     |          |           |
//!  Completed  NotFound   Accepted(Operation: InProgress)
//!                            |
//!                    poll_operation()   (only when WaitPolicy.blocking)
//!                            |
//!                 +----------+----------+
//!             Succeeded             Failed
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod progress;
pub mod resources;
pub mod session;
pub mod submit;

pub use client::{MutationResponse, PlatformClient};
pub use config::{Config, ConfigError, PollingConfig, Profile, Target};
pub use error::{CoreError, Result};
pub use operation::{Operation, OperationKind, OperationState, WaitPolicy};
pub use progress::{ProgressCallback, ProgressEvent, poll_operation};
pub use session::{Session, TargetRef};
pub use submit::{Submission, submit, submit_and_wait};
