//! Viewing and changing the targeted org and space

use cfctl_core::{CoreError, Session, Target};
use serde_json::json;
use tracing::info;

use crate::connection::ConnectionManager;
use crate::error::{CfCtlError, Result as CliResult};
use crate::output::{self, OutputFormat};

fn print_target(session: &Session, target: &Target, output: OutputFormat) -> CliResult<()> {
    if output.is_structured() {
        let data = json!({
            "api_endpoint": session.client().base_url(),
            "user": session.username(),
            "org": target.org_name,
            "space": target.space_name,
        });
        output::print_output(&data, output)?;
        return Ok(());
    }

    output::print_fields(&[
        ("API endpoint", session.client().base_url().to_string()),
        ("user", session.username().to_string()),
        ("org", target.org_name.clone().unwrap_or_default()),
        ("space", target.space_name.clone().unwrap_or_default()),
    ]);
    Ok(())
}

/// `cf target [-o ORG] [-s SPACE]`
///
/// With no flags the current target is shown. Selecting an org drops the
/// previously targeted space; selecting a space looks it up in the org that
/// is targeted after `-o` has been applied.
pub async fn handle_target(
    session: &Session,
    conn_mgr: &ConnectionManager,
    profile_name: &str,
    org: Option<&str>,
    space: Option<&str>,
    output: OutputFormat,
) -> CliResult<()> {
    let mut target = session.target().clone();

    if org.is_none() && space.is_none() {
        return print_target(session, &target, output);
    }

    let client = session.client();

    if let Some(org_name) = org {
        let found = client
            .find_organization(org_name)
            .await?
            .ok_or_else(|| CfCtlError::NotFound {
                message: format!("Organization '{}' not found.", org_name),
            })?;
        target.set_org(&found.name, &found.guid);
    }

    if let Some(space_name) = space {
        let org_guid = target.org_guid.clone().ok_or(CoreError::NoTarget {
            kind: "org",
            article: "an",
            hint: "cf target -o ORG",
        })?;
        let found = client
            .find_space(&org_guid, space_name)
            .await?
            .ok_or_else(|| CfCtlError::NotFound {
                message: format!("Space '{}' not found.", space_name),
            })?;
        target.set_space(&found.name, &found.guid);
    }

    let mut config = conn_mgr.config.clone();
    config.profile_mut(profile_name)?.target = target.clone();
    conn_mgr.save_config(&config)?;
    info!(
        "Profile {} now targets org {:?} / space {:?}",
        profile_name, target.org_name, target.space_name
    );

    print_target(session, &target, output)
}
