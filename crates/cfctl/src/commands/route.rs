//! Route commands: route-service unbinding and orphaned-route cleanup

use cfctl_core::{OperationKind, Session, Submission, WaitPolicy, submit, submit_and_wait};
use tracing::debug;

use super::async_utils::{OperationMessages, report_submission};
use super::confirm::confirm_action;
use crate::error::{CfCtlError, Result as CliResult};

/// `host.domain/path` as shown to the user
pub fn route_url(domain: &str, hostname: Option<&str>, path: Option<&str>) -> String {
    let mut url = match hostname {
        Some(host) if !host.is_empty() => format!("{}.{}", host, domain),
        _ => domain.to_string(),
    };
    if let Some(path) = path.filter(|p| !p.is_empty()) {
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);
    }
    url
}

fn normalized_path(path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("/{}", p),
        None => String::new(),
    }
}

pub async fn unbind_route_service(
    session: &Session,
    domain: &str,
    instance: &str,
    hostname: Option<&str>,
    path: Option<&str>,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;
    let route = route_url(domain, hostname, path);

    if !confirm_action(
        &format!(
            "Really unbind route {} from service instance {}?",
            route, instance
        ),
        force,
    )? {
        println!("Unbind cancelled");
        return Ok(());
    }

    println!(
        "Unbinding route {} from service instance {} in org {} / space {} as {}...",
        route,
        instance,
        org.name,
        space.name,
        session.username()
    );
    println!();

    let messages = OperationMessages::for_instance(instance).not_found(format!(
        "Route {} was not bound to service instance {}.",
        route, instance
    ));

    let client = session.client();
    let mut binding = None;
    if let Some(domain_res) = client.find_domain(domain).await?
        && let Some(route_res) = client
            .find_route(
                &domain_res.guid,
                hostname.unwrap_or_default(),
                &normalized_path(path),
            )
            .await?
        && let Some(instance_res) = client.find_service_instance(&space.guid, instance).await?
    {
        binding = client
            .find_route_binding(&route_res.guid, &instance_res.guid)
            .await?;
    }

    let submission = match binding {
        Some(binding) => {
            debug!("Deleting route binding {}", binding.guid);
            submit(
                client,
                instance,
                OperationKind::Unbind,
                policy,
                client.delete_route_binding(&binding.guid),
            )
            .await?
        }
        None => Submission::NotFound,
    };

    report_submission(client, submission, policy, &messages).await?;
    println!("OK");
    Ok(())
}

pub async fn delete_orphaned_routes(
    session: &Session,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let (org, space) = session.require_space()?;

    if !confirm_action("Really delete orphaned routes?", force)? {
        println!("Routes have not been deleted.");
        return Ok(());
    }

    println!(
        "Deleting orphaned routes in org {} / space {} as {}...",
        org.name,
        space.name,
        session.username()
    );
    println!();

    let client = session.client();
    let submission = submit_and_wait(
        client,
        "orphaned routes",
        OperationKind::Delete,
        policy,
        client.delete_unmapped_routes(&space.guid),
        None,
    )
    .await?;

    if submission == Submission::NotFound {
        return Err(CfCtlError::NotFound {
            message: format!("Space '{}' not found.", space.name),
        });
    }

    println!("OK");
    Ok(())
}
