//! Service key commands

use cfctl_core::resources::ServiceInstance;
use cfctl_core::{OperationKind, Session, Submission, WaitPolicy, submit};
use tracing::info;

use super::async_utils::{OperationMessages, report_submission};
use super::confirm::confirm_action;
use super::parse_parameters;
use crate::error::{CfCtlError, Result as CliResult};
use crate::output::{self, OutputFormat};

fn key_hint(instance: &str, key: &str) -> OperationMessages {
    OperationMessages {
        status_hint: format!(
            "Use 'cf service-keys {}' or 'cf service-key {} {}' to check operation status.",
            instance, instance, key
        ),
        ..OperationMessages::default()
    }
}

async fn require_instance(session: &Session, instance: &str) -> CliResult<ServiceInstance> {
    let (_, space) = session.require_space()?;
    session
        .client()
        .find_service_instance(&space.guid, instance)
        .await?
        .ok_or_else(|| CfCtlError::NotFound {
            message: format!("Service instance '{}' not found", instance),
        })
}

pub async fn create_service_key(
    session: &Session,
    instance: &str,
    key: &str,
    parameters: Option<&str>,
    policy: &WaitPolicy,
) -> CliResult<()> {
    session.require_space()?;
    let parameters = parse_parameters(parameters)?;
    let client = session.client();

    println!(
        "Creating service key {} for service instance {} as {}...",
        key,
        instance,
        session.username()
    );
    println!();

    let instance_res = require_instance(session, instance).await?;

    if client
        .find_service_key(&instance_res.guid, key)
        .await?
        .is_some()
    {
        println!("Service key {} already exists", key);
        println!("OK");
        return Ok(());
    }

    let submission = submit(
        client,
        key,
        OperationKind::Provision,
        policy,
        client.create_service_key(&instance_res.guid, key, parameters.as_ref()),
    )
    .await?;

    report_submission(client, submission, policy, &key_hint(instance, key)).await?;
    println!("OK");
    Ok(())
}

pub async fn list_service_keys(
    session: &Session,
    instance: &str,
    output: OutputFormat,
) -> CliResult<()> {
    session.require_space()?;

    if !output.is_structured() {
        println!(
            "Getting keys for service instance {} as {}...",
            instance,
            session.username()
        );
        println!();
    }

    let instance_res = require_instance(session, instance).await?;
    let keys = session
        .client()
        .list_service_keys(&instance_res.guid)
        .await?;
    info!("Found {} service keys", keys.len());

    if output.is_structured() {
        output::print_output(&keys, output)?;
        return Ok(());
    }

    if keys.is_empty() {
        println!("No service keys for service instance {}", instance);
        return Ok(());
    }

    let rows = keys
        .iter()
        .map(|k| {
            vec![
                k.name.clone().unwrap_or_default(),
                k.last_operation
                    .as_ref()
                    .map(|op| op.summary())
                    .unwrap_or_default(),
                k.last_operation
                    .as_ref()
                    .and_then(|op| op.description.clone())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    output::print_rows(&["name", "last operation", "message"], rows);
    Ok(())
}

pub async fn show_service_key(
    session: &Session,
    instance: &str,
    key: &str,
    guid_only: bool,
    output: OutputFormat,
) -> CliResult<()> {
    session.require_space()?;

    if !guid_only && !output.is_structured() {
        println!(
            "Getting key {} for service instance {} as {}...",
            key,
            instance,
            session.username()
        );
        println!();
    }

    let client = session.client();
    let instance_res = require_instance(session, instance).await?;
    let key_res = client
        .find_service_key(&instance_res.guid, key)
        .await?
        .ok_or_else(|| CfCtlError::NotFound {
            message: format!(
                "No service key {} found for service instance {}",
                key, instance
            ),
        })?;

    if guid_only {
        println!("{}", key_res.guid);
        return Ok(());
    }

    let details = client.service_key_details(&key_res.guid).await?;
    output::print_output(&details, output)?;
    Ok(())
}

pub async fn delete_service_key(
    session: &Session,
    instance: &str,
    key: &str,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (_, space) = session.require_space()?;

    if !confirm_action(&format!("Really delete the service key {}?", key), force)? {
        println!("Delete cancelled");
        return Ok(());
    }

    println!(
        "Deleting key {} for service instance {} as {}...",
        key,
        instance,
        session.username()
    );
    println!();

    let gone = format!(
        "Service key {} does not exist for service instance {}.",
        key, instance
    );
    let messages = key_hint(instance, key)
        .completed(format!("Service key {} deleted.", key))
        .not_found(gone);

    let client = session.client();
    let existing = match client.find_service_instance(&space.guid, instance).await? {
        Some(instance_res) => client.find_service_key(&instance_res.guid, key).await?,
        None => None,
    };

    let submission = match existing {
        Some(key_res) => {
            submit(
                client,
                key,
                OperationKind::Delete,
                policy,
                client.delete_credential_binding(&key_res.guid),
            )
            .await?
        }
        None => Submission::NotFound,
    };

    report_submission(client, submission, policy, &messages).await?;
    println!("OK");
    Ok(())
}
