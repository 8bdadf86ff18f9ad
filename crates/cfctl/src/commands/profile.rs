//! Profile management command implementations

use cfctl_core::{Config, Profile};
use colored::Colorize;
use serde_json::json;
use tracing::{debug, info, trace};

use super::confirm::confirm_action;
use crate::cli::ProfileCommands;
use crate::connection::ConnectionManager;
use crate::error::{CfCtlError, Result as CliResult};
use crate::output::{self, OutputFormat};

/// Handle profile management commands
pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr, output_format),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            api_url,
            username,
            token,
            skip_ssl_validation,
        } => handle_set(
            conn_mgr,
            name,
            api_url,
            username,
            token,
            *skip_ssl_validation,
        ),
        Remove { name, force } => handle_remove(conn_mgr, name, force.force),
        ProfileCommands::Default { name } => handle_default(conn_mgr, name),
    }
}

fn config_path_display(conn_mgr: &ConnectionManager) -> Option<String> {
    conn_mgr
        .config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .or_else(|| Config::config_path().ok().map(|p| p.display().to_string()))
}

fn target_label(profile: &Profile) -> String {
    match (&profile.target.org_name, &profile.target.space_name) {
        (Some(org), Some(space)) => format!("{} / {}", org, space),
        (Some(org), None) => org.clone(),
        _ => String::new(),
    }
}

/// Show only the first and last characters of a token
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();
    trace!("Found {} profiles", profiles.len());
    let default = conn_mgr.config.default_profile.as_deref();

    if output_format.is_structured() {
        let profile_list: Vec<serde_json::Value> = profiles
            .iter()
            .map(|(name, profile)| {
                json!({
                    "name": name,
                    "api_url": profile.api_url,
                    "username": profile.username,
                    "is_default": default == Some(name.as_str()),
                    "org": profile.target.org_name,
                    "space": profile.target.space_name,
                })
            })
            .collect();
        let data = json!({
            "config_path": config_path_display(conn_mgr),
            "profiles": profile_list,
            "count": profiles.len(),
        });
        output::print_output(&data, output_format)?;
        return Ok(());
    }

    if let Some(path) = config_path_display(conn_mgr) {
        println!("Configuration file: {}", path);
        println!();
    }

    if profiles.is_empty() {
        info!("No profiles configured");
        println!("No profiles configured.");
        println!("Use 'cf profile set' to create a profile.");
        return Ok(());
    }

    let rows = profiles
        .iter()
        .map(|(name, profile)| {
            let marker = if default == Some(name.as_str()) {
                "*".green().to_string()
            } else {
                String::new()
            };
            vec![
                format!("{}{}", name, marker),
                profile.api_url.clone(),
                profile.username.clone(),
                target_label(profile),
            ]
        })
        .collect();
    output::print_rows(&["name", "api endpoint", "user", "target"], rows);
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let path = match &conn_mgr.config_path {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    if output_format.is_structured() {
        output::print_output(json!({ "config_path": path.display().to_string() }), output_format)?;
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    debug!("Showing profile: {}", name);
    let profile = conn_mgr
        .config
        .profiles
        .get(name)
        .ok_or_else(|| CfCtlError::ProfileNotFound {
            name: name.to_string(),
        })?;
    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);

    if output_format.is_structured() {
        let data = json!({
            "name": name,
            "api_url": profile.api_url,
            "username": profile.username,
            "token": mask_token(&profile.token),
            "skip_ssl_validation": profile.skip_ssl_validation,
            "is_default": is_default,
            "target": profile.target,
        });
        output::print_output(&data, output_format)?;
        return Ok(());
    }

    output::print_fields(&[
        ("Profile", name.to_string()),
        ("API endpoint", profile.api_url.clone()),
        ("User", profile.username.clone()),
        ("Token", mask_token(&profile.token)),
        (
            "Skip SSL validation",
            profile.skip_ssl_validation.to_string(),
        ),
        ("Org", profile.target.org_name.clone().unwrap_or_default()),
        ("Space", profile.target.space_name.clone().unwrap_or_default()),
        ("Default", if is_default { "yes" } else { "no" }.to_string()),
    ]);
    Ok(())
}

fn handle_set(
    conn_mgr: &ConnectionManager,
    name: &str,
    api_url: &str,
    username: &str,
    token: &str,
    skip_ssl_validation: bool,
) -> CliResult<()> {
    debug!("Setting profile: {}", name);
    let mut config = conn_mgr.config.clone();

    // Re-pointing a profile keeps what it was targeting
    let target = config
        .profiles
        .get(name)
        .map(|existing| existing.target.clone())
        .unwrap_or_default();

    config.set_profile(
        name.to_string(),
        Profile {
            api_url: api_url.to_string(),
            username: username.to_string(),
            token: token.to_string(),
            skip_ssl_validation,
            target,
        },
    );

    let first_profile = config.profiles.len() == 1;
    if first_profile {
        config.default_profile = Some(name.to_string());
    }

    conn_mgr.save_config(&config)?;
    info!("Saved profile {}", name);

    println!("Profile '{}' saved successfully.", name);
    if first_profile {
        println!("Set as default profile.");
    }
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str, force: bool) -> CliResult<()> {
    debug!("Removing profile: {}", name);

    if !conn_mgr.config.profiles.contains_key(name) {
        return Err(CfCtlError::ProfileNotFound {
            name: name.to_string(),
        });
    }

    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);
    if is_default {
        println!("Warning: '{}' is the default profile.", name);
    }

    if !confirm_action(
        &format!("Are you sure you want to remove profile '{}'?", name),
        force,
    )? {
        println!("Profile removal cancelled.");
        return Ok(());
    }

    let mut config = conn_mgr.config.clone();
    config.remove_profile(name);
    conn_mgr.save_config(&config)?;

    println!("Profile '{}' removed.", name);
    if is_default {
        println!("Default profile cleared.");
    }
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    if !conn_mgr.config.profiles.contains_key(name) {
        return Err(CfCtlError::ProfileNotFound {
            name: name.to_string(),
        });
    }

    let mut config = conn_mgr.config.clone();
    config.default_profile = Some(name.to_string());
    conn_mgr.save_config(&config)?;

    println!("Default profile set to '{}'.", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token_long() {
        assert_eq!(mask_token("abcdefghijklmnop"), "abcd...mnop");
    }

    #[test]
    fn test_mask_token_short() {
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token(""), "");
    }

    #[test]
    fn test_target_label() {
        let mut profile = Profile {
            api_url: "https://api.example.com".to_string(),
            username: "admin".to_string(),
            token: "t".to_string(),
            skip_ssl_validation: false,
            target: Default::default(),
        };
        assert_eq!(target_label(&profile), "");
        profile.target.set_org("my-org", "o1");
        assert_eq!(target_label(&profile), "my-org");
        profile.target.set_space("dev", "s1");
        assert_eq!(target_label(&profile), "my-org / dev");
    }
}
