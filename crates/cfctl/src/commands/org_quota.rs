//! Organization quota deletion

use cfctl_core::{OperationKind, Session, Submission, WaitPolicy, submit_and_wait};
use tracing::info;

use super::confirm::confirm_action;
use crate::error::Result as CliResult;

pub async fn delete_org_quota(
    session: &Session,
    quota: &str,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    if !confirm_action(&format!("Really delete the org quota {}?", quota), force)? {
        println!("Organization quota '{}' has not been deleted.", quota);
        return Ok(());
    }

    println!("Deleting org quota {} as {}...", quota, session.username());

    let client = session.client();
    let submission = match client.find_organization_quota(quota).await? {
        Some(found) => {
            submit_and_wait(
                client,
                quota,
                OperationKind::Delete,
                policy,
                client.delete_organization_quota(&found.guid),
                None,
            )
            .await?
        }
        None => Submission::NotFound,
    };

    if submission == Submission::NotFound {
        info!("Organization quota {} not found", quota);
        eprintln!("Organization quota with name '{}' not found.", quota);
    }
    println!("OK");
    Ok(())
}
