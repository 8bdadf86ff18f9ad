//! CLI structure and command definitions
//!
//! Service commands follow the platform's asynchronous-operation contract:
//! without `--wait` an accepted operation is reported as "in progress",
//! with `--wait` the command blocks until the platform job is terminal.

use std::time::Duration;

use cfctl_core::{PollingConfig, WaitPolicy};
use clap::{Args, Parser, Subcommand};

/// Platform CLI for services, spaces, quotas, domains and routes
#[derive(Parser, Debug)]
#[command(name = "cf")]
#[command(version, about = "Manage service instances and platform resources")]
#[command(long_about = "
Manage service instances and platform resources

Service operations may be handled asynchronously by the service broker.
By default cf reports the operation as in progress and returns; pass
--wait to block until it completes.

EXAMPLES:
    # Configure an endpoint and target an org and space
    cf profile set dev --api-url https://api.example.com --username admin --token \"$CF_TOKEN\"
    cf target -o my-org -s my-space

    # Create a service instance and wait for the broker
    cf create-service p-mysql small my-db --wait

    # Delete without a confirmation prompt
    cf delete-service my-db -f

    # List service instances as JSON
    cf services --output json

For more help on a specific command, run:
    cf <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short = 'p', global = true, env = "CF_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "CF_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format for listing commands
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Flags shared by commands whose broker may answer asynchronously
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Wait for the operation to complete
    #[arg(long, short = 'w')]
    pub wait: bool,

    /// Maximum time to wait in seconds (default from config, 900)
    #[arg(long, requires = "wait")]
    pub wait_timeout: Option<u64>,
}

impl WaitArgs {
    pub fn policy(&self, polling: &PollingConfig) -> WaitPolicy {
        let policy = WaitPolicy::from_polling(self.wait, polling);
        match self.wait_timeout {
            Some(secs) => policy.with_timeout(Some(Duration::from_secs(secs))),
            None => policy,
        }
    }
}

/// Skip the confirmation prompt
#[derive(Args, Debug, Clone, Default)]
pub struct ForceArgs {
    /// Force deletion without confirmation
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a service instance
    #[command(name = "create-service", visible_alias = "cs")]
    #[command(after_help = "EXAMPLES:
    cf create-service p-mysql small my-db
    cf create-service p-mysql small my-db -c '{\"ram_gb\":4}' --wait
    cf create-service p-mysql small my-db -c ./params.json
")]
    CreateService {
        /// Service offering name
        offering: String,
        /// Plan name
        plan: String,
        /// Name for the new service instance
        name: String,
        /// Arbitrary parameters as inline JSON or a path to a JSON file
        #[arg(short = 'c', value_name = "JSON")]
        parameters: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// List service instances in the targeted space
    #[command(name = "services", visible_alias = "s")]
    Services,

    /// Show service instance info
    #[command(name = "service")]
    Service {
        /// Service instance name
        name: String,
        /// Retrieve and display the given service instance's guid only
        #[arg(long)]
        guid: bool,
    },

    /// Delete a service instance
    #[command(name = "delete-service", visible_alias = "ds")]
    DeleteService {
        /// Service instance name
        name: String,
        #[command(flatten)]
        force: ForceArgs,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Remove a service instance and its bindings without contacting the broker
    #[command(name = "purge-service-instance")]
    PurgeServiceInstance {
        /// Service instance name
        name: String,
        #[command(flatten)]
        force: ForceArgs,
    },

    /// Upgrade a service instance to the latest maintenance version of its plan
    #[command(name = "upgrade-service")]
    UpgradeService {
        /// Service instance name
        name: String,
        #[command(flatten)]
        force: ForceArgs,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Bind a service instance to an app
    #[command(name = "bind-service", visible_alias = "bs")]
    BindService {
        /// App name
        app: String,
        /// Service instance name
        instance: String,
        /// Arbitrary binding parameters as inline JSON or a path to a JSON file
        #[arg(short = 'c', value_name = "JSON")]
        parameters: Option<String>,
        /// Name to expose the service instance to the app
        #[arg(long)]
        binding_name: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Unbind a service instance from an app
    #[command(name = "unbind-service", visible_alias = "us")]
    UnbindService {
        /// App name
        app: String,
        /// Service instance name
        instance: String,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Create a service key
    #[command(name = "create-service-key", visible_alias = "csk")]
    CreateServiceKey {
        /// Service instance name
        instance: String,
        /// Service key name
        key: String,
        /// Arbitrary parameters as inline JSON or a path to a JSON file
        #[arg(short = 'c', value_name = "JSON")]
        parameters: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// List keys for a service instance
    #[command(name = "service-keys", visible_alias = "sk")]
    ServiceKeys {
        /// Service instance name
        instance: String,
    },

    /// Show service key info
    #[command(name = "service-key")]
    ServiceKey {
        /// Service instance name
        instance: String,
        /// Service key name
        key: String,
        /// Retrieve and display the given service key's guid only
        #[arg(long)]
        guid: bool,
    },

    /// Delete a service key
    #[command(name = "delete-service-key", visible_alias = "dsk")]
    DeleteServiceKey {
        /// Service instance name
        instance: String,
        /// Service key name
        key: String,
        #[command(flatten)]
        force: ForceArgs,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Unbind a route from a route service instance
    #[command(name = "unbind-route-service", visible_alias = "urs")]
    UnbindRouteService {
        /// Domain of the route
        domain: String,
        /// Service instance name
        instance: String,
        /// Hostname used with the domain to identify the route
        #[arg(long, short = 'n')]
        hostname: Option<String>,
        /// Path used with the domain and hostname to identify the route
        #[arg(long)]
        path: Option<String>,
        #[command(flatten)]
        force: ForceArgs,
        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete an organization quota
    #[command(name = "delete-org-quota")]
    DeleteOrgQuota {
        /// Quota name
        quota: String,
        #[command(flatten)]
        force: ForceArgs,
    },

    /// Delete a space
    #[command(name = "delete-space")]
    DeleteSpace {
        /// Space name
        space: String,
        /// Org containing the space (defaults to the targeted org)
        #[arg(short = 'o', value_name = "ORG")]
        org: Option<String>,
        #[command(flatten)]
        force: ForceArgs,
    },

    /// Delete a private domain
    #[command(name = "delete-private-domain")]
    DeletePrivateDomain {
        /// Domain name
        domain: String,
        #[command(flatten)]
        force: ForceArgs,
    },

    /// Delete all routes in the targeted space that are not mapped to an app
    #[command(name = "delete-orphaned-routes")]
    DeleteOrphanedRoutes {
        #[command(flatten)]
        force: ForceArgs,
    },

    /// Set or view the targeted org or space
    #[command(name = "target", visible_alias = "t")]
    Target {
        /// Organization
        #[arg(short = 'o', value_name = "ORG")]
        org: Option<String>,
        /// Space
        #[arg(short = 's', value_name = "SPACE")]
        space: Option<String>,
    },

    /// Profile management commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    #[command(after_help = "EXAMPLES:
    # Bash
    cf completions bash > ~/.local/share/bash-completion/completions/cf

    # Zsh
    cf completions zsh > ~/.zfunc/_cf

    # Fish
    cf completions fish > ~/.config/fish/completions/cf.fish
")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(after_help = "EXAMPLES:
    cf profile set dev --api-url https://api.example.com --username admin --token \"$CF_TOKEN\"
    cf profile set local --api-url https://api.local.example --username admin --token abc --skip-ssl-validation
")]
    Set {
        /// Profile name
        name: String,
        /// Platform API endpoint
        #[arg(long)]
        api_url: String,
        /// User name shown in command output
        #[arg(long)]
        username: String,
        /// Bearer token (stored as given; `${VAR}` is expanded on load)
        #[arg(long)]
        token: String,
        /// Accept self-signed certificates
        #[arg(long)]
        skip_ssl_validation: bool,
    },

    /// Remove a profile
    Remove {
        /// Profile name to remove
        name: String,
        #[command(flatten)]
        force: ForceArgs,
    },

    /// Set the default profile
    Default {
        /// Profile name
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_wait_flag_short_and_long() {
        let cli = Cli::try_parse_from(["cf", "delete-service", "my-db", "-w", "-f"]).unwrap();
        match cli.command {
            Commands::DeleteService { wait, force, .. } => {
                assert!(wait.wait);
                assert!(force.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_wait_timeout_requires_wait() {
        let result = Cli::try_parse_from(["cf", "delete-service", "my-db", "--wait-timeout", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_wait_policy_from_args() {
        let polling = PollingConfig {
            interval_ms: 10,
            timeout_secs: 900,
        };
        let args = WaitArgs {
            wait: true,
            wait_timeout: Some(30),
        };
        let policy = args.policy(&polling);
        assert!(policy.blocking);
        assert_eq!(policy.poll_interval, Duration::from_millis(10));
        assert_eq!(policy.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unbind_route_service_flags() {
        let cli = Cli::try_parse_from([
            "cf",
            "unbind-route-service",
            "example.com",
            "my-route-svc",
            "-n",
            "www",
            "--path",
            "/api",
        ])
        .unwrap();
        match cli.command {
            Commands::UnbindRouteService { hostname, path, .. } => {
                assert_eq!(hostname.as_deref(), Some("www"));
                assert_eq!(path.as_deref(), Some("/api"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
