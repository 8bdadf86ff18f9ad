//! Progress tracking and job polling for asynchronous operations
//!
//! Accepted mutations hand back a job URL which must be polled until the
//! job reaches a terminal state. This module provides that polling with
//! optional progress callbacks for UI updates.

use crate::client::PlatformClient;
use crate::error::{CoreError, Result};
use crate::operation::{Operation, OperationState, WaitPolicy};
use crate::resources::{Job, JobState};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Progress events emitted while waiting on an operation
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Polling has started
    Started { resource: String },
    /// Polling iteration with current job state
    Polling {
        resource: String,
        state: JobState,
        elapsed: Duration,
    },
    /// Job completed successfully
    Completed { resource: String },
    /// Job failed
    Failed { resource: String, error: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to print progress dots and drive a spinner.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// GETs spent on a job still `PROCESSING` before a non-blocking caller
/// reports it as in progress
const SETTLE_ATTEMPTS: u32 = 3;

/// Upper bound on the pause between those GETs
const SETTLE_INTERVAL_CAP: Duration = Duration::from_secs(1);

/// Poll the job behind `job_url` until `done` accepts its state
///
/// The timeout counts from `started`, so waits that span several calls
/// share one deadline.
async fn poll_job_until(
    client: &PlatformClient,
    job_url: &str,
    policy: &WaitPolicy,
    started: Instant,
    resource: &str,
    on_progress: &Option<ProgressCallback>,
    done: impl Fn(JobState) -> bool,
) -> Result<Job> {
    loop {
        let elapsed = started.elapsed();
        if let Some(timeout) = policy.timeout
            && elapsed > timeout
        {
            return Err(CoreError::OperationTimeout(timeout));
        }

        let job = client.get_job(job_url).await?;
        trace!("Job {} is {:?} after {:?}", job.guid, job.state, elapsed);

        emit(
            on_progress,
            ProgressEvent::Polling {
                resource: resource.to_string(),
                state: job.state,
                elapsed,
            },
        );

        if done(job.state) {
            return Ok(job);
        }

        tokio::time::sleep(policy.poll_interval).await;
    }
}

/// Poll a freshly accepted job until the platform has finished its own part
///
/// Returns the job once it is no longer `PROCESSING`: `COMPLETE` and
/// `FAILED` mean the broker answered synchronously, `POLLING` means the
/// broker is working asynchronously. A blocking policy keeps polling until
/// its timeout (counted from `started`); otherwise the job is returned after
/// a few quick GETs even if it is still `PROCESSING`.
pub(crate) async fn settle_job(
    client: &PlatformClient,
    job_url: &str,
    policy: &WaitPolicy,
    started: Instant,
) -> Result<Job> {
    debug!("Waiting for job {} to leave PROCESSING", job_url);

    if policy.blocking {
        return poll_job_until(client, job_url, policy, started, job_url, &None, |state| {
            state != JobState::Processing
        })
        .await;
    }

    let pause = policy.poll_interval.min(SETTLE_INTERVAL_CAP);
    let mut attempt = 1;
    loop {
        let job = client.get_job(job_url).await?;
        trace!("Job {} is {:?} (settle attempt {})", job.guid, job.state, attempt);
        if job.state != JobState::Processing || attempt >= SETTLE_ATTEMPTS {
            return Ok(job);
        }
        attempt += 1;
        tokio::time::sleep(pause).await;
    }
}

/// Poll an in-progress operation until it succeeds or fails
///
/// # Arguments
///
/// * `client` - The platform API client
/// * `operation` - The accepted operation; its state is advanced in place
/// * `policy` - Poll interval and optional timeout
/// * `on_progress` - Optional callback for progress updates
///
/// # Returns
///
/// `Ok(())` once the operation succeeded. A failed job is returned as
/// [`CoreError::OperationFailed`] carrying the job's error detail, and the
/// operation is left in `Failed`. Exceeding the timeout, measured from when
/// the mutation was submitted, yields [`CoreError::OperationTimeout`] with
/// the operation still `InProgress`.
///
/// # Example
///
/// ```rust,ignore
/// use cfctl_core::{poll_operation, ProgressEvent, WaitPolicy};
///
/// poll_operation(
///     &client,
///     &mut operation,
///     &WaitPolicy::default().blocking(),
///     Some(Box::new(|event| {
///         if let ProgressEvent::Polling { state, elapsed, .. } = event {
///             println!("{:?} ({:.0}s)", state, elapsed.as_secs());
///         }
///     })),
/// ).await?;
/// ```
pub async fn poll_operation(
    client: &PlatformClient,
    operation: &mut Operation,
    policy: &WaitPolicy,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    let resource = operation.resource_name().to_string();

    emit(
        &on_progress,
        ProgressEvent::Started {
            resource: resource.clone(),
        },
    );

    let job = poll_job_until(
        client,
        operation.job_url(),
        policy,
        operation.started(),
        &resource,
        &on_progress,
        JobState::is_terminal,
    )
    .await?;

    match job.state {
        JobState::Complete => {
            operation.transition(OperationState::Succeeded, None)?;
            emit(&on_progress, ProgressEvent::Completed { resource });
            Ok(())
        }
        _ => {
            let error = job.failure_message();
            operation.transition(OperationState::Failed, Some(error.clone()))?;
            emit(
                &on_progress,
                ProgressEvent::Failed {
                    resource,
                    error: error.clone(),
                },
            );
            Err(CoreError::OperationFailed {
                message: error,
                job_guid: Some(job.guid),
            })
        }
    }
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
