//! Long-running, broker-mediated operations
//!
//! An [`Operation`] is created when the platform accepts a mutation for
//! asynchronous processing and is advanced only by status polls. State only
//! moves forward: `InProgress` to `Succeeded` or `Failed`, never back out.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::PollingConfig;
use crate::error::{CoreError, Result};

/// What the operation does to its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Bind,
    Unbind,
    Delete,
    Upgrade,
    Provision,
}

impl OperationKind {
    /// Noun used in "<Verb> in progress." lines
    pub fn verb(self) -> &'static str {
        match self {
            OperationKind::Bind => "Binding",
            OperationKind::Unbind => "Unbinding",
            OperationKind::Delete => "Delete",
            OperationKind::Upgrade => "Upgrade",
            OperationKind::Provision => "Create",
        }
    }

    /// Past tense used in completion lines ("Service instance X deleted.")
    pub fn past_tense(self) -> &'static str {
        match self {
            OperationKind::Bind => "bound",
            OperationKind::Unbind => "unbound",
            OperationKind::Delete => "deleted",
            OperationKind::Upgrade => "upgraded",
            OperationKind::Provision => "created",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationState {
    InProgress,
    Succeeded,
    Failed,
}

impl OperationState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OperationState::InProgress)
    }
}

/// Tracked asynchronous mutation against one named resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    resource_name: String,
    kind: OperationKind,
    state: OperationState,
    last_message: Option<String>,
    job_url: String,
    #[serde(skip)]
    started: Instant,
}

impl Operation {
    /// A freshly accepted operation, always `InProgress`
    pub fn accepted(resource_name: &str, kind: OperationKind, job_url: &str) -> Self {
        Self {
            resource_name: resource_name.to_string(),
            kind,
            state: OperationState::InProgress,
            last_message: None,
            job_url: job_url.to_string(),
            started: Instant::now(),
        }
    }

    /// Count waiting time from `started` instead of from acceptance
    pub fn started_at(self, started: Instant) -> Self {
        Self { started, ..self }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub fn job_url(&self) -> &str {
        &self.job_url
    }

    /// When the mutation was submitted; the wait timeout runs from here
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Advance the state. Leaving a terminal state is an error and leaves
    /// the operation untouched; re-reporting `InProgress` is a no-op.
    pub fn transition(&mut self, next: OperationState, message: Option<String>) -> Result<()> {
        if self.state.is_terminal() {
            return Err(CoreError::InvalidTransition {
                resource: self.resource_name.clone(),
                from: self.state,
                to: next,
            });
        }

        self.state = next;
        if message.is_some() {
            self.last_message = message;
        }
        Ok(())
    }
}

/// Whether and how long to block on an accepted operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitPolicy {
    pub blocking: bool,
    pub poll_interval: Duration,
    pub timeout: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitPolicy::from_polling(false, &PollingConfig::default())
    }
}

impl WaitPolicy {
    pub fn from_polling(blocking: bool, polling: &PollingConfig) -> Self {
        Self {
            blocking,
            poll_interval: polling.interval(),
            timeout: Some(polling.timeout()),
        }
    }

    /// Same cadence, but always block
    pub fn blocking(self) -> Self {
        Self {
            blocking: true,
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_is_in_progress() {
        let op = Operation::accepted("my-db", OperationKind::Delete, "/v3/jobs/job-1");
        assert_eq!(op.state(), OperationState::InProgress);
        assert_eq!(op.resource_name(), "my-db");
        assert_eq!(op.kind(), OperationKind::Delete);
        assert_eq!(op.job_url(), "/v3/jobs/job-1");
        assert!(op.last_message().is_none());
    }

    #[test]
    fn test_transition_to_terminal() {
        let mut op = Operation::accepted("my-db", OperationKind::Upgrade, "/v3/jobs/j");
        op.transition(OperationState::InProgress, None).unwrap();
        op.transition(
            OperationState::Failed,
            Some("broker unavailable".to_string()),
        )
        .unwrap();
        assert_eq!(op.state(), OperationState::Failed);
        assert_eq!(op.last_message(), Some("broker unavailable"));
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut op = Operation::accepted("my-db", OperationKind::Delete, "/v3/jobs/j");
        op.transition(OperationState::Succeeded, None).unwrap();

        let err = op
            .transition(OperationState::InProgress, Some("again".to_string()))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(op.state(), OperationState::Succeeded);
        assert!(op.last_message().is_none());

        assert!(op.transition(OperationState::Failed, None).is_err());
        assert_eq!(op.state(), OperationState::Succeeded);
    }

    #[test]
    fn test_started_at_keeps_submission_time() {
        let submitted = Instant::now() - Duration::from_secs(30);
        let op = Operation::accepted("k", OperationKind::Provision, "/v3/jobs/abc-123")
            .started_at(submitted);
        assert_eq!(op.started(), submitted);
        assert!(op.started().elapsed() >= Duration::from_secs(30));
    }

    #[test]
    fn test_kind_wording() {
        assert_eq!(OperationKind::Delete.verb(), "Delete");
        assert_eq!(OperationKind::Delete.past_tense(), "deleted");
        assert_eq!(OperationKind::Upgrade.verb(), "Upgrade");
        assert_eq!(OperationKind::Unbind.verb(), "Unbinding");
        assert_eq!(OperationKind::Provision.past_tense(), "created");
    }

    #[test]
    fn test_wait_policy_from_polling() {
        let polling = PollingConfig {
            interval_ms: 250,
            timeout_secs: 60,
        };
        let policy = WaitPolicy::from_polling(false, &polling);
        assert!(!policy.blocking);
        assert_eq!(policy.poll_interval, Duration::from_millis(250));
        assert_eq!(policy.timeout, Some(Duration::from_secs(60)));

        let policy = policy.blocking().with_timeout(None);
        assert!(policy.blocking);
        assert!(policy.timeout.is_none());
    }
}
