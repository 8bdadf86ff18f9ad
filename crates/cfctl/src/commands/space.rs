//! Space deletion

use cfctl_core::{OperationKind, Session, Submission, TargetRef, WaitPolicy, submit_and_wait};
use tracing::{debug, info};

use super::confirm::confirm_action;
use crate::connection::ConnectionManager;
use crate::error::{CfCtlError, Result as CliResult};

/// Org named with `-o`, otherwise the targeted one
async fn resolve_org(session: &Session, org: Option<&str>) -> CliResult<TargetRef> {
    match org {
        Some(name) => {
            let found = session
                .client()
                .find_organization(name)
                .await?
                .ok_or_else(|| CfCtlError::NotFound {
                    message: format!("Organization '{}' not found.", name),
                })?;
            Ok(TargetRef {
                name: found.name,
                guid: found.guid,
            })
        }
        None => Ok(session.require_org()?),
    }
}

pub async fn delete_space(
    session: &Session,
    conn_mgr: &ConnectionManager,
    profile_name: &str,
    space: &str,
    org: Option<&str>,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let org = resolve_org(session, org).await?;

    if !confirm_action(&format!("Really delete the space {}?", space), force)? {
        println!("'{}' has not been deleted.", space);
        return Ok(());
    }

    println!(
        "Deleting space {} in org {} as {}...",
        space,
        org.name,
        session.username()
    );

    let client = session.client();
    let found = client.find_space(&org.guid, space).await?;
    let submission = match &found {
        Some(found) => {
            submit_and_wait(
                client,
                space,
                OperationKind::Delete,
                policy,
                client.delete_space(&found.guid),
                None,
            )
            .await?
        }
        None => Submission::NotFound,
    };

    if submission == Submission::NotFound {
        eprintln!("Space '{}' does not exist.", space);
        println!("OK");
        return Ok(());
    }
    println!("OK");

    let deleted_guid = found.map(|s| s.guid);
    if deleted_guid.is_some() && session.target().space_guid == deleted_guid {
        info!("Deleted the targeted space, clearing it from profile {}", profile_name);
        let mut config = conn_mgr.config.clone();
        config.profile_mut(profile_name)?.target.clear_space();
        conn_mgr.save_config(&config)?;
        println!();
        println!("TIP: No space targeted, use 'cf target -s' to target a space.");
    } else {
        debug!("Targeted space unaffected");
    }
    Ok(())
}
