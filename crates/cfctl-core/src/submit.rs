//! Operation submission
//!
//! Sends a mutation and classifies the platform's immediate answer as a
//! synchronous result, an accepted asynchronous [`Operation`], or a
//! resource that no longer exists.

use std::future::Future;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{MutationResponse, PlatformClient};
use crate::error::{CoreError, Result};
use crate::operation::{Operation, OperationKind, WaitPolicy};
use crate::progress::{ProgressCallback, poll_operation, settle_job};
use crate::resources::JobState;

/// Immediate outcome of a submitted mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Applied synchronously; carries the response body when there was one
    Completed(Option<Value>),
    /// Broker is working asynchronously
    Accepted(Operation),
    /// Resource vanished between lookup and mutation
    NotFound,
}

/// Submit a mutation and interpret the platform's response
///
/// A `202 Accepted` is followed by polling the job until the platform has
/// handed off to the broker, so a synchronous broker still yields
/// [`Submission::Completed`]. Without a blocking policy that polling is
/// brief, and a job still `PROCESSING` afterwards is reported as accepted.
pub async fn submit<F>(
    client: &PlatformClient,
    resource_name: &str,
    kind: OperationKind,
    policy: &WaitPolicy,
    request: F,
) -> Result<Submission>
where
    F: Future<Output = Result<MutationResponse>>,
{
    let started = Instant::now();
    let response = match request.await {
        Ok(response) => response,
        Err(e) if e.is_not_found() => {
            info!("{} disappeared before {:?} was applied", resource_name, kind);
            return Ok(Submission::NotFound);
        }
        Err(e) => return Err(e),
    };

    match response {
        MutationResponse::Done(body) => {
            debug!("{:?} of {} applied synchronously", kind, resource_name);
            Ok(Submission::Completed(body))
        }
        MutationResponse::Accepted { job_url } => {
            let job = settle_job(client, &job_url, policy, started).await?;
            match job.state {
                JobState::Complete => Ok(Submission::Completed(None)),
                JobState::Failed => Err(CoreError::OperationFailed {
                    message: job.failure_message(),
                    job_guid: Some(job.guid),
                }),
                JobState::Polling | JobState::Processing => {
                    info!("{:?} of {} is in progress", kind, resource_name);
                    Ok(Submission::Accepted(
                        Operation::accepted(resource_name, kind, &job_url).started_at(started),
                    ))
                }
            }
        }
    }
}

/// Submit a mutation and, if accepted, block until it finishes
///
/// Used for platform-internal jobs (space, quota and domain deletion) that
/// have no non-blocking mode.
pub async fn submit_and_wait<F>(
    client: &PlatformClient,
    resource_name: &str,
    kind: OperationKind,
    policy: &WaitPolicy,
    request: F,
    on_progress: Option<ProgressCallback>,
) -> Result<Submission>
where
    F: Future<Output = Result<MutationResponse>>,
{
    let policy = policy.blocking();
    match submit(client, resource_name, kind, &policy, request).await? {
        Submission::Accepted(mut operation) => {
            poll_operation(client, &mut operation, &policy, on_progress).await?;
            Ok(Submission::Accepted(operation))
        }
        other => Ok(other),
    }
}
