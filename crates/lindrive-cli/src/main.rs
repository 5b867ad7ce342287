//! lindrive CLI - Command-line interface for lindrive
//!
//! Exposes the sync substrate's primitives directly:
//! - Viewing the tracked sync state
//! - Listing remote folders
//! - Downloading and uploading individual files
//! - Creating remote folders and inspecting remote metadata
//!
//! Deciding *what* to sync is the Monitor's and Poller's job; this
//! binary only drives one primitive at a time.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    files::{InfoCommand, MkdirCommand},
    list::ListCommand,
    status::StatusCommand,
    transfer::{GetCommand, PutCommand},
};

#[derive(Debug, Parser)]
#[command(name = "lindrive", version, about = "Google Drive sync tooling for Linux")]
pub struct Cli {
    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the tracked sync state
    Status(StatusCommand),
    /// List the children of a remote folder
    List(ListCommand),
    /// Download a remote file
    Get(GetCommand),
    /// Upload a local file
    Put(PutCommand),
    /// Create a remote folder
    Mkdir(MkdirCommand),
    /// Show metadata for a remote item
    Info(InfoCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Status(cmd) => cmd.execute(&config),
        Commands::List(cmd) => cmd.execute(&config).await,
        Commands::Get(cmd) => cmd.execute(&config).await,
        Commands::Put(cmd) => cmd.execute(&config).await,
        Commands::Mkdir(cmd) => cmd.execute(&config).await,
        Commands::Info(cmd) => cmd.execute(&config).await,
    }
}
