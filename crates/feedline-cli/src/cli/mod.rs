//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use feedline_core::config;
use feedline_core::interrupt;

mod commands;

#[derive(Parser)]
#[command(name = "feedline")]
#[command(version)]
#[command(about = "Live timeline viewer for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Write debug-level logs
    #[arg(long)]
    debug: bool,

    /// Start with an empty panel instead of loading recent messages
    #[arg(long = "no-backfill")]
    no_backfill: bool,

    /// Override the panel title from config
    #[arg(long)]
    title: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init().context("install Ctrl+C handler")?;

    // Multi-threaded: the UI loop blocks its worker while ingestion runs.
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        debug,
        no_backfill,
        title,
    } = cli;

    match command {
        None => {
            let mut config = config::Config::load().context("load config")?;
            if let Some(title) = title {
                config.title = title;
            }
            if no_backfill {
                config.backfill = false;
            }
            commands::watch::run(&config, debug).await
        }
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
