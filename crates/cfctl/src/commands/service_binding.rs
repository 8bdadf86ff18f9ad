//! Binding service instances to apps

use cfctl_core::{OperationKind, Session, Submission, WaitPolicy, submit};
use tracing::debug;

use super::async_utils::{OperationMessages, report_submission};
use super::parse_parameters;
use crate::error::{CfCtlError, Result as CliResult};

fn app_not_found(app: &str) -> CfCtlError {
    CfCtlError::NotFound {
        message: format!("App '{}' not found", app),
    }
}

fn instance_not_found(instance: &str) -> CfCtlError {
    CfCtlError::NotFound {
        message: format!("Service instance '{}' not found", instance),
    }
}

pub async fn bind_service(
    session: &Session,
    app: &str,
    instance: &str,
    parameters: Option<&str>,
    binding_name: Option<&str>,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;
    let parameters = parse_parameters(parameters)?;
    let client = session.client();

    println!(
        "Binding service instance {} to app {} in org {} / space {} as {}...",
        instance,
        app,
        org.name,
        space.name,
        session.username()
    );
    println!();

    let app_res = client
        .find_app(&space.guid, app)
        .await?
        .ok_or_else(|| app_not_found(app))?;
    let instance_res = client
        .find_service_instance(&space.guid, instance)
        .await?
        .ok_or_else(|| instance_not_found(instance))?;

    if client
        .find_app_binding(&app_res.guid, &instance_res.guid)
        .await?
        .is_some()
    {
        println!(
            "App {} is already bound to service instance {}.",
            app, instance
        );
        println!("OK");
        return Ok(());
    }

    let submission = submit(
        client,
        instance,
        OperationKind::Bind,
        policy,
        client.create_app_binding(
            &app_res.guid,
            &instance_res.guid,
            binding_name,
            parameters.as_ref(),
        ),
    )
    .await?;

    report_submission(
        client,
        submission,
        policy,
        &OperationMessages::for_instance(instance),
    )
    .await?;
    println!("OK");
    Ok(())
}

pub async fn unbind_service(
    session: &Session,
    app: &str,
    instance: &str,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;
    let client = session.client();

    println!(
        "Unbinding app {} from service instance {} in org {} / space {} as {}...",
        app,
        instance,
        org.name,
        space.name,
        session.username()
    );
    println!();

    let messages = OperationMessages::for_instance(instance).not_found(format!(
        "Binding between {} and {} did not exist",
        instance, app
    ));

    let app_res = client
        .find_app(&space.guid, app)
        .await?
        .ok_or_else(|| app_not_found(app))?;
    let instance_res = client
        .find_service_instance(&space.guid, instance)
        .await?
        .ok_or_else(|| instance_not_found(instance))?;

    let submission = match client
        .find_app_binding(&app_res.guid, &instance_res.guid)
        .await?
    {
        Some(binding) => {
            debug!("Deleting binding {}", binding.guid);
            submit(
                client,
                instance,
                OperationKind::Unbind,
                policy,
                client.delete_credential_binding(&binding.guid),
            )
            .await?
        }
        None => Submission::NotFound,
    };

    report_submission(client, submission, policy, &messages).await?;
    println!("OK");
    Ok(())
}
