//! Command-line interface for drop_token.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drop Token - two-player column drop game server
#[derive(Parser, Debug)]
#[command(name = "drop_token")]
#[command(about = "Drop token game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to the TOML config file (defaults are used if it is missing)
        #[arg(short, long, default_value = "drop_token.toml")]
        config: PathBuf,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the default configuration as TOML
    DefaultConfig,
}
