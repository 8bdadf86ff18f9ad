//! Reporting for asynchronous service operations
//!
//! Wraps the core poller with the CLI's output: an "in progress" hint when
//! not waiting, and a progress indicator followed by the completion line
//! when `--wait` was given.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use cfctl_core::resources::JobState;
use cfctl_core::{
    Operation, PlatformClient, ProgressCallback, ProgressEvent, Submission, WaitPolicy,
    poll_operation,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::error::Result as CliResult;

const WAITING_LINE: &str = "Waiting for the operation to complete...";

/// Lines printed for each possible outcome of one command
#[derive(Debug, Clone, Default)]
pub struct OperationMessages {
    /// Printed once the operation has finished successfully
    pub completed: Option<String>,
    /// Printed when the resource vanished before the mutation landed
    pub not_found: Option<String>,
    /// Follow-up sentence appended to "<Verb> in progress."
    pub status_hint: String,
}

impl OperationMessages {
    /// Hint pointing at `cf services` / `cf service NAME`
    pub fn for_instance(name: &str) -> Self {
        Self {
            status_hint: format!(
                "Use 'cf services' or 'cf service {}' to check operation status.",
                name
            ),
            ..Self::default()
        }
    }

    pub fn completed(mut self, line: impl Into<String>) -> Self {
        self.completed = Some(line.into());
        self
    }

    pub fn not_found(mut self, line: impl Into<String>) -> Self {
        self.not_found = Some(line.into());
        self
    }
}

/// Print the outcome of a submitted operation, waiting for it when asked
pub async fn report_submission(
    client: &PlatformClient,
    submission: Submission,
    policy: &WaitPolicy,
    messages: &OperationMessages,
) -> CliResult<()> {
    match submission {
        Submission::Completed(_) => print_line(&messages.completed),
        Submission::NotFound => print_line(&messages.not_found),
        Submission::Accepted(operation) if operation.state().is_terminal() => {
            print_line(&messages.completed)
        }
        Submission::Accepted(mut operation) if policy.blocking => {
            wait_for_operation(client, &mut operation, policy).await?;
            print_line(&messages.completed);
        }
        Submission::Accepted(operation) => {
            debug!(
                "Not waiting for {:?} of {}",
                operation.kind(),
                operation.resource_name()
            );
            println!(
                "{} in progress. {}",
                operation.kind().verb(),
                messages.status_hint
            );
        }
    }
    Ok(())
}

fn print_line(line: &Option<String>) {
    if let Some(line) = line {
        println!("{}", line);
    }
}

/// Block until the operation is terminal, showing progress
///
/// The "Waiting..." line is always printed first. A terminal then gets a
/// spinner with the job state; otherwise a dot is printed per poll on the
/// following line.
pub async fn wait_for_operation(
    client: &PlatformClient,
    operation: &mut Operation,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let interactive = std::io::stdout().is_terminal();
    println!("{}", WAITING_LINE);

    let spinner = if interactive {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let pb_clone = spinner.clone();
    let progress_callback: ProgressCallback = Box::new(move |event| match event {
        ProgressEvent::Started { resource } => {
            if let Some(pb) = &pb_clone {
                pb.set_message(resource);
            }
        }
        ProgressEvent::Polling {
            resource, state, ..
        } => match &pb_clone {
            Some(pb) => pb.set_message(format!("{}: {}", resource, format_job_state(state))),
            None => {
                print!(".");
                let _ = std::io::stdout().flush();
            }
        },
        ProgressEvent::Completed { .. } | ProgressEvent::Failed { .. } => {}
    });

    let result = poll_operation(client, operation, policy, Some(progress_callback)).await;

    match spinner {
        Some(pb) => pb.finish_and_clear(),
        // Terminates the row of dots
        None => println!(),
    }

    Ok(result?)
}

fn format_job_state(state: JobState) -> &'static str {
    match state {
        JobState::Processing => "processing",
        JobState::Polling => "in progress",
        JobState::Complete => "complete",
        JobState::Failed => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_hint() {
        let messages = OperationMessages::for_instance("my-db")
            .completed("Service instance my-db deleted.")
            .not_found("Service instance my-db did not exist.");
        assert_eq!(
            messages.status_hint,
            "Use 'cf services' or 'cf service my-db' to check operation status."
        );
        assert_eq!(
            messages.completed.as_deref(),
            Some("Service instance my-db deleted.")
        );
    }

    #[test]
    fn test_job_state_labels() {
        assert_eq!(format_job_state(JobState::Polling), "in progress");
        assert_eq!(format_job_state(JobState::Failed), "failed");
    }
}
