//! Consequences CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write a default config and empty tables
//! - `invite`  — Send the response-form link to this session's players
//! - `play`    — Work out and deliver everyone's consequence
//! - `submit`  — Add a response to the local response log
//! - `status`  — Show configuration and the current session
//! - `doctor`  — Diagnose configuration, tables, and delivery
//! - `config`  — Validate, show, or locate the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "consequences",
    about = "Consequences — the party game, run from the command line",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config.toml (defaults to ~/.consequences/config.toml)
    #[arg(short, long, global = true, env = "CONSEQUENCES_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and tables
    Onboard,

    /// Email the response form to everyone playing this session
    Invite,

    /// Build and deliver this session's consequences
    Play {
        /// Compute and print the consequences without sending them
        #[arg(long)]
        dry_run: bool,

        /// Print the plan or report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a response (one answer per category) to the local log
    Submit {
        /// Answers in category order
        #[arg(required = true)]
        answers: Vec<String>,
    },

    /// Show configuration and the current session
    Status,

    /// Diagnose system health
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Check the configuration for errors
    Validate,
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Onboard => commands::onboard::run(config_path).await?,
        Commands::Invite => commands::invite::run(config_path).await?,
        Commands::Play { dry_run, json } => commands::play::run(config_path, dry_run, json).await?,
        Commands::Submit { answers } => commands::submit::run(config_path, answers).await?,
        Commands::Status => commands::status::run(config_path).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate(config_path).await?,
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path(config_path).await?,
        },
    }

    Ok(())
}
