//! Private domain deletion

use cfctl_core::{OperationKind, Session, Submission, WaitPolicy, submit_and_wait};

use super::confirm::confirm_action;
use crate::error::{CfCtlError, Result as CliResult};

pub async fn delete_private_domain(
    session: &Session,
    domain: &str,
    force: bool,
    policy: &WaitPolicy,
) -> CliResult<()> {
    let prompt = format!(
        "Deleting the private domain will remove associated routes which will make apps with this domain unreachable.\nReally delete the private domain {}?",
        domain
    );
    if !confirm_action(&prompt, force)? {
        println!("'{}' has not been deleted.", domain);
        return Ok(());
    }

    println!("Deleting private domain {} as {}...", domain, session.username());

    let client = session.client();
    let submission = match client.find_domain(domain).await? {
        Some(found) if !found.is_private() => {
            return Err(CfCtlError::InvalidInput {
                message: format!(
                    "Domain '{}' is a shared domain, not a private domain.",
                    domain
                ),
            });
        }
        Some(found) => {
            submit_and_wait(
                client,
                domain,
                OperationKind::Delete,
                policy,
                client.delete_domain(&found.guid),
                None,
            )
            .await?
        }
        None => Submission::NotFound,
    };

    if submission == Submission::NotFound {
        eprintln!("Domain {} does not exist", domain);
    }
    println!("OK");
    Ok(())
}
