//! Stratus CLI - provision container services against a sandbox cloud.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stratus_deploy::{DeployConfig, LogFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Provision versioned container services")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to stratus.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a service spec without contacting anything
    Validate {
        /// Service spec file (TOML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Print the revision the next deployment would create
    NextVersion {
        /// Service spec file (TOML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Sandbox state file
        #[arg(long)]
        state: PathBuf,
    },

    /// Provision a new revision of the service
    Deploy {
        /// Service spec file (TOML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Sandbox state file
        #[arg(long)]
        state: PathBuf,

        /// Write the resulting sandbox state back to the state file
        #[arg(long)]
        write_state: bool,
    },
}

fn init_tracing(config: &DeployConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DeployConfig::from_file(path),
        None => DeployConfig::load(),
    }
    .context("failed to load configuration")?;

    init_tracing(&config);

    match cli.command {
        Commands::Validate { spec } => commands::validate::run(&spec)?,
        Commands::NextVersion { spec, state } => {
            commands::next_version::run(&spec, &state, config).await?;
        }
        Commands::Deploy {
            spec,
            state,
            write_state,
        } => {
            let args = commands::deploy::DeployArgs {
                spec,
                state,
                write_state,
            };
            commands::deploy::run(args, config).await?;
        }
    }

    Ok(())
}
