//! Service instance commands

use cfctl_core::resources::ServiceInstance;
use cfctl_core::{OperationKind, Session, Submission, WaitPolicy, submit, submit_and_wait};
use tracing::{debug, info};

use super::async_utils::{OperationMessages, report_submission};
use super::confirm::confirm_action;
use super::parse_parameters;
use crate::error::{CfCtlError, Result as CliResult};
use crate::output::{self, OutputFormat};

const PURGE_WARNING: &str = "WARNING: This operation assumes that the service broker responsible for this service instance is no longer available or is not responding with a 200 or 410, and the service instance has been deleted, leaving orphan records in the platform's database. All knowledge of the service instance will be removed, including service bindings and service keys.";

const UPGRADE_WARNING: &str = "Warning: This operation may be long running and will block further operations on the service instance until it's completed";

fn instance_not_found(name: &str) -> CfCtlError {
    CfCtlError::NotFound {
        message: format!("Service instance '{}' not found", name),
    }
}

async fn find_instance(
    session: &Session,
    space_guid: &str,
    name: &str,
) -> CliResult<Option<ServiceInstance>> {
    Ok(session
        .client()
        .find_service_instance(space_guid, name)
        .await?)
}

pub async fn create_service(
    session: &Session,
    offering: &str,
    plan: &str,
    name: &str,
    parameters: Option<&str>,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;
    let parameters = parse_parameters(parameters)?;
    let client = session.client();

    println!(
        "Creating service instance {} in org {} / space {} as {}...",
        name,
        org.name,
        space.name,
        session.username()
    );
    println!();

    if find_instance(session, &space.guid, name).await?.is_some() {
        println!("Service instance {} already exists", name);
        println!("OK");
        return Ok(());
    }

    let offering_res = client
        .find_service_offering(offering)
        .await?
        .ok_or_else(|| CfCtlError::NotFound {
            message: format!("Service offering '{}' not found.", offering),
        })?;
    let plan_res = client
        .find_service_plan(&offering_res.guid, plan)
        .await?
        .ok_or_else(|| CfCtlError::NotFound {
            message: format!(
                "The plan {} could not be found for service offering {}.",
                plan, offering
            ),
        })?;
    debug!("Resolved plan {} to {}", plan, plan_res.guid);

    let submission = submit(
        client,
        name,
        OperationKind::Provision,
        policy,
        client.create_service_instance(name, &space.guid, &plan_res.guid, parameters.as_ref()),
    )
    .await?;

    let messages = OperationMessages::for_instance(name)
        .completed(format!("Service instance {} created.", name));
    report_submission(client, submission, policy, &messages).await?;
    println!("OK");
    Ok(())
}

pub async fn list_services(session: &Session, output: OutputFormat) -> CliResult<()> {
    let (org, space) = session.require_space()?;

    if !output.is_structured() {
        println!(
            "Getting service instances in org {} / space {} as {}...",
            org.name,
            space.name,
            session.username()
        );
        println!();
    }

    let instances = session
        .client()
        .list_service_instances(&space.guid)
        .await?;
    info!("Found {} service instances", instances.len());

    if output.is_structured() {
        output::print_output(&instances, output)?;
        return Ok(());
    }

    if instances.is_empty() {
        println!("No service instances found.");
        return Ok(());
    }

    let rows = instances
        .iter()
        .map(|instance| {
            vec![
                instance.name.clone(),
                instance.instance_type.clone(),
                instance
                    .last_operation
                    .as_ref()
                    .map(|op| op.summary())
                    .unwrap_or_default(),
                if instance.upgrade_available {
                    "yes".to_string()
                } else {
                    "no".to_string()
                },
            ]
        })
        .collect();
    output::print_rows(
        &["name", "type", "last operation", "upgrade available"],
        rows,
    );
    Ok(())
}

pub async fn show_service(
    session: &Session,
    name: &str,
    guid_only: bool,
    output: OutputFormat,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;

    if !guid_only && !output.is_structured() {
        println!(
            "Showing info of service instance {} in org {} / space {} as {}...",
            name,
            org.name,
            space.name,
            session.username()
        );
        println!();
    }

    let instance = find_instance(session, &space.guid, name)
        .await?
        .ok_or_else(|| instance_not_found(name))?;

    if guid_only {
        println!("{}", instance.guid);
        return Ok(());
    }

    if output.is_structured() {
        output::print_output(&instance, output)?;
        return Ok(());
    }

    let last_operation = instance.last_operation.as_ref();
    output::print_fields(&[
        ("name", instance.name.clone()),
        ("guid", instance.guid.clone()),
        ("type", instance.instance_type.clone()),
        (
            "status",
            last_operation.map(|op| op.summary()).unwrap_or_default(),
        ),
        (
            "message",
            last_operation
                .and_then(|op| op.description.clone())
                .unwrap_or_default(),
        ),
        (
            "upgrade available",
            if instance.upgrade_available {
                "yes".to_string()
            } else {
                "no".to_string()
            },
        ),
    ]);
    Ok(())
}

pub async fn delete_service(
    session: &Session,
    name: &str,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;

    if !confirm_action(
        &format!("Really delete the service instance {}?", name),
        force,
    )? {
        println!("Delete cancelled");
        return Ok(());
    }

    println!(
        "Deleting service instance {} in org {} / space {} as {}...",
        name,
        org.name,
        space.name,
        session.username()
    );
    println!();

    let messages = OperationMessages::for_instance(name)
        .completed(format!("Service instance {} deleted.", name))
        .not_found(format!("Service instance {} did not exist.", name));

    let client = session.client();
    let submission = match find_instance(session, &space.guid, name).await? {
        Some(instance) => {
            submit(
                client,
                name,
                OperationKind::Delete,
                policy,
                client.delete_service_instance(&instance.guid),
            )
            .await?
        }
        None => Submission::NotFound,
    };

    report_submission(client, submission, policy, &messages).await?;
    println!("OK");
    Ok(())
}

pub async fn purge_service_instance(
    session: &Session,
    name: &str,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;

    if !confirm_action(
        &format!(
            "{}\nReally purge service instance {} from the platform?",
            PURGE_WARNING, name
        ),
        force,
    )? {
        println!("Purge cancelled");
        return Ok(());
    }

    println!(
        "Purging service instance {} in org {} / space {} as {}...",
        name,
        org.name,
        space.name,
        session.username()
    );
    println!();

    let messages = OperationMessages::for_instance(name)
        .completed(format!("Service instance {} purged.", name))
        .not_found(format!("Service instance {} did not exist.", name));

    let client = session.client();
    let submission = match find_instance(session, &space.guid, name).await? {
        Some(instance) => {
            submit_and_wait(
                client,
                name,
                OperationKind::Delete,
                policy,
                client.purge_service_instance(&instance.guid),
                None,
            )
            .await?
        }
        None => Submission::NotFound,
    };

    report_submission(client, submission, policy, &messages).await?;
    println!("OK");
    Ok(())
}

pub async fn upgrade_service(
    session: &Session,
    name: &str,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;

    if !confirm_action(
        &format!(
            "{}\nDo you really want to upgrade the service instance {}?",
            UPGRADE_WARNING, name
        ),
        force,
    )? {
        println!("Upgrade cancelled");
        return Ok(());
    }

    println!(
        "Upgrading service instance {} in org {} / space {} as {}...",
        name,
        org.name,
        space.name,
        session.username()
    );
    println!();

    let instance = find_instance(session, &space.guid, name)
        .await?
        .ok_or_else(|| instance_not_found(name))?;

    let client = session.client();
    let target_version = if instance.upgrade_available {
        client
            .service_instance_plan(&instance.guid)
            .await?
            .maintenance_info
            .map(|info| info.version)
    } else {
        None
    };

    let Some(version) = target_version else {
        println!("No upgrade is available.");
        println!("OK");
        return Ok(());
    };
    info!("Upgrading {} to maintenance version {}", name, version);

    let submission = submit(
        client,
        name,
        OperationKind::Upgrade,
        policy,
        client.upgrade_service_instance(&instance.guid, &version),
    )
    .await?;

    let messages = OperationMessages::for_instance(name)
        .completed(format!("Upgrade of service instance {} complete.", name));
    report_submission(client, submission, policy, &messages).await?;
    println!("OK");
    Ok(())
}
