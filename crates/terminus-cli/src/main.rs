//! # terminus CLI
//!
//! Inspect configuration and run crash drills against the termination
//! sequence.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use terminus_config::log_cli_debug;

mod config_cmd;
mod crash;

/// terminus - last-resort fatal error reporting
#[derive(Parser)]
#[command(name = "terminus")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or create configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Run a termination sequence on purpose. Never returns; the process aborts.
    Crash(crash::CrashArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Print global and project config paths
    Path,

    /// Write a default project config
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Target path
        #[arg(long, default_value = terminus_config::PROJECT_CONFIG_PATH)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = terminus_config::config().clone();
    terminus_config::init_logging(config.logging.level);
    if !config.install() {
        log_cli_debug!("Terminator options were already installed");
    }

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::show(&config),
            ConfigCommands::Path => config_cmd::path(),
            ConfigCommands::Init { force, path } => config_cmd::init(&path, force),
        },
        Commands::Crash(args) => crash::run(args),
    }
}
