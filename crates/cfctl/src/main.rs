use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells};
use cfctl_core::{Config, WaitPolicy};
use colored::Colorize;
use tracing::{debug, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::Result as CliResult;
use output::OutputFormat;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => exit_with_usage(e),
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        println!("{}", "FAILED".red().bold());
        e.print_diagnostic();
        std::process::exit(1);
    }
}

/// Print clap's help/version as-is; anything else is an incorrect usage
fn exit_with_usage(err: clap::Error) -> ! {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = err.print();
            std::process::exit(0);
        }
        _ => {}
    }

    let rendered = err.render().to_string();
    let detail = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    eprintln!("{} {}", "Incorrect Usage:".red().bold(), detail);
    println!();

    let mut cmd = Cli::command();
    cmd.build();
    let invoked = std::env::args()
        .skip(1)
        .filter(|arg| !arg.starts_with('-'))
        .find_map(|arg| cmd.find_subcommand(&arg).map(|sub| sub.get_name().to_string()));
    let help = match invoked.and_then(|name| cmd.find_subcommand(&name).cloned()) {
        Some(mut sub) => sub.render_help(),
        None => cmd.render_help(),
    };
    println!("{}", help);
    std::process::exit(1);
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "cf=warn,cfctl_core=warn",
            1 => "cf=info,cfctl_core=info",
            2 => "cf=debug,cfctl_core=debug",
            _ => "cf=trace,cfctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn run(cli: &Cli) -> CliResult<()> {
    // Load configuration from specified path or default location
    let (config, config_path) = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        let config = Config::load_from_path(&path)?;
        (config, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    let conn_mgr = ConnectionManager::with_config_path(config, config_path);

    execute_command(cli, &conn_mgr).await
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> CliResult<()> {
    trace!("Executing command: {:?}", cli.command);
    info!("Command: {}", format_command(&cli.command));

    let start = std::time::Instant::now();
    let result = dispatch(cli, conn_mgr).await;

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => info!("Command failed after {:?}: {}", duration, e),
    }

    result
}

async fn dispatch(cli: &Cli, conn_mgr: &ConnectionManager) -> CliResult<()> {
    use commands::{
        domain, org_quota, profile, route, service, service_binding, service_key, space, target,
    };

    let output = OutputFormat::from_cli(cli.output);
    let polling = &conn_mgr.config.polling;
    // Platform-internal jobs have no non-blocking mode
    let blocking = WaitPolicy::from_polling(true, polling);
    let profile_name = cli.profile.as_deref();

    match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            if output.is_structured() {
                let data = serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "name": "cf",
                });
                output::print_output(&data, output)?;
            } else {
                println!("cf {}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(*shell);
            Ok(())
        }
        Commands::Profile(profile_cmd) => {
            profile::handle_profile_command(profile_cmd, conn_mgr, output).await
        }

        Commands::CreateService {
            offering,
            plan,
            name,
            parameters,
            wait,
        } => {
            let session = conn_mgr.session(profile_name)?;
            service::create_service(
                &session,
                offering,
                plan,
                name,
                parameters.as_deref(),
                &wait.policy(polling),
            )
            .await
        }
        Commands::Services => {
            let session = conn_mgr.session(profile_name)?;
            service::list_services(&session, output).await
        }
        Commands::Service { name, guid } => {
            let session = conn_mgr.session(profile_name)?;
            service::show_service(&session, name, *guid, output).await
        }
        Commands::DeleteService { name, force, wait } => {
            let session = conn_mgr.session(profile_name)?;
            service::delete_service(&session, name, force.force, &wait.policy(polling)).await
        }
        Commands::PurgeServiceInstance { name, force } => {
            let session = conn_mgr.session(profile_name)?;
            service::purge_service_instance(&session, name, force.force, &blocking).await
        }
        Commands::UpgradeService { name, force, wait } => {
            let session = conn_mgr.session(profile_name)?;
            service::upgrade_service(&session, name, force.force, &wait.policy(polling)).await
        }

        Commands::BindService {
            app,
            instance,
            parameters,
            binding_name,
            wait,
        } => {
            let session = conn_mgr.session(profile_name)?;
            service_binding::bind_service(
                &session,
                app,
                instance,
                parameters.as_deref(),
                binding_name.as_deref(),
                &wait.policy(polling),
            )
            .await
        }
        Commands::UnbindService {
            app,
            instance,
            wait,
        } => {
            let session = conn_mgr.session(profile_name)?;
            service_binding::unbind_service(&session, app, instance, &wait.policy(polling)).await
        }

        Commands::CreateServiceKey {
            instance,
            key,
            parameters,
            wait,
        } => {
            let session = conn_mgr.session(profile_name)?;
            service_key::create_service_key(
                &session,
                instance,
                key,
                parameters.as_deref(),
                &wait.policy(polling),
            )
            .await
        }
        Commands::ServiceKeys { instance } => {
            let session = conn_mgr.session(profile_name)?;
            service_key::list_service_keys(&session, instance, output).await
        }
        Commands::ServiceKey {
            instance,
            key,
            guid,
        } => {
            let session = conn_mgr.session(profile_name)?;
            service_key::show_service_key(&session, instance, key, *guid, output).await
        }
        Commands::DeleteServiceKey {
            instance,
            key,
            force,
            wait,
        } => {
            let session = conn_mgr.session(profile_name)?;
            service_key::delete_service_key(
                &session,
                instance,
                key,
                force.force,
                &wait.policy(polling),
            )
            .await
        }

        Commands::UnbindRouteService {
            domain,
            instance,
            hostname,
            path,
            force,
            wait,
        } => {
            let session = conn_mgr.session(profile_name)?;
            route::unbind_route_service(
                &session,
                domain,
                instance,
                hostname.as_deref(),
                path.as_deref(),
                force.force,
                &wait.policy(polling),
            )
            .await
        }
        Commands::DeleteOrphanedRoutes { force } => {
            let session = conn_mgr.session(profile_name)?;
            route::delete_orphaned_routes(&session, force.force, &blocking).await
        }

        Commands::DeleteOrgQuota { quota, force } => {
            let session = conn_mgr.session(profile_name)?;
            org_quota::delete_org_quota(&session, quota, force.force, &blocking).await
        }
        Commands::DeleteSpace { space, org, force } => {
            let (name, _) = conn_mgr.resolve_profile(profile_name)?;
            let session = conn_mgr.session(Some(&name))?;
            space::delete_space(
                &session,
                conn_mgr,
                &name,
                space,
                org.as_deref(),
                force.force,
                &blocking,
            )
            .await
        }
        Commands::DeletePrivateDomain { domain, force } => {
            let session = conn_mgr.session(profile_name)?;
            domain::delete_private_domain(&session, domain, force.force, &blocking).await
        }

        Commands::Target { org, space } => {
            let (name, _) = conn_mgr.resolve_profile(profile_name)?;
            let session = conn_mgr.session(Some(&name))?;
            target::handle_target(
                &session,
                conn_mgr,
                &name,
                org.as_deref(),
                space.as_deref(),
                output,
            )
            .await
        }
    }
}

/// Generate shell completions
fn generate_completions(shell: cli::Shell) {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}

/// Format command for human-readable logging (without sensitive data)
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Profile(cmd) => {
            use cli::ProfileCommands::*;
            match cmd {
                List => "profile list".to_string(),
                Path => "profile path".to_string(),
                Show { name } => format!("profile show {}", name),
                Set { name, .. } => format!("profile set {} [credentials redacted]", name),
                Remove { name, .. } => format!("profile remove {}", name),
                cli::ProfileCommands::Default { name } => format!("profile default {}", name),
            }
        }
        Commands::CreateService {
            offering,
            plan,
            name,
            ..
        } => format!("create-service {} {} {}", offering, plan, name),
        Commands::BindService { app, instance, .. } => {
            format!("bind-service {} {}", app, instance)
        }
        Commands::CreateServiceKey { instance, key, .. } => {
            format!("create-service-key {} {}", instance, key)
        }
        other => format!("{:?}", other),
    }
}
