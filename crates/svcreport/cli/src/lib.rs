//! svcreport CLI - IT service availability report
//!
//! Queries the IT services tree of a Zabbix server, resolves every
//! service's availability over the last day, week and month together with
//! its active problems, and prints the tree as one flat table.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod commands;
mod config;
mod error;
mod output;

use commands::report::{self, ReportArgs};
use config::{CliConfig, DEFAULT_SERVER};
pub use error::{CliError, CliResult};

/// svcreport CLI application
#[derive(Parser)]
#[command(name = "svcreport")]
#[command(about = "IT services availability report", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SVCREPORT_CONFIG")]
    config: Option<String>,

    /// Zabbix server URL
    #[arg(long, env = "SVCREPORT_SERVER")]
    server: Option<String>,

    /// Zabbix API user
    #[arg(short, long, env = "SVCREPORT_USERNAME")]
    username: Option<String>,

    /// Zabbix API password
    #[arg(short, long, env = "SVCREPORT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Build the IT services report
    Report(ReportArgs),

    /// Show configuration
    Config,

    /// Check server connectivity
    Status,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    // Load config
    let mut config = CliConfig::load(cli.config.as_deref())?.with_overrides(
        cli.server,
        cli.username,
        cli.password,
    );
    let server = config
        .server
        .get_or_insert_with(|| DEFAULT_SERVER.to_string())
        .clone();
    let timeout = Duration::from_secs(config.timeout_seconds.unwrap_or(30));

    match cli.command {
        Commands::Config => {
            output::print_single(&config.masked(), cli.output)
        }
        Commands::Status => {
            let client = client::ZabbixClient::new(&server, timeout)?;
            match client.api_version().await {
                Ok(version) => {
                    output::print_success(&format!("Zabbix API reachable at {}", client.api_url()));
                    println!("  Version: {}", version);
                    Ok(())
                }
                Err(e) => {
                    output::print_error(&format!("Cannot reach Zabbix API: {}", e));
                    std::process::exit(1);
                }
            }
        }
        Commands::Report(args) => {
            let options = args.into_options(&config.report);
            options.validate()?;

            let username = config
                .username
                .clone()
                .ok_or_else(|| CliError::Config("no Zabbix user given".into()))?;
            let password = config
                .password
                .clone()
                .ok_or_else(|| CliError::Config("no Zabbix password given".into()))?;

            let mut client = client::ZabbixClient::new(&server, timeout)?;
            client.login(&username, &password).await?;

            report::execute(&options, Arc::new(client), cli.output).await
        }
    }
}
