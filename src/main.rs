//! Drop Token - game server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use drop_token::{AppConfig, GameService, router};
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(&config, host, port).await,
        Command::DefaultConfig => {
            print!("{}", toml::to_string_pretty(&AppConfig::default())?);
            Ok(())
        }
    }
}

/// Run the HTTP game server
#[instrument(skip(host, port), fields(config = %config_path.display()))]
async fn run_server(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = AppConfig::load_or_default(config_path)?;
    config.override_server(host, port);

    let store = config.store().open()?;
    let service = GameService::new(store, *config.board());
    let app = router(service);

    let addr = (config.server().host().as_str(), *config.server().port());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        host = %config.server().host(),
        port = config.server().port(),
        "Server ready at http://{}:{}/drop_token",
        config.server().host(),
        config.server().port()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
