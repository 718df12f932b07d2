mod api;
mod auth;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod server;
mod subscribe;

#[cfg(test)]
mod integration_tests;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::AuthState;
use crate::cli::{Cli, Commands, ServeArgs};
use crate::config::Settings;
use crate::server::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Admin commands print to stdout, so keep them quiet unless asked
    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        Commands::Sources(_) => "warn",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Serve(args) => serve(cli.config.as_deref(), args).await,
        Commands::Sources(args) => commands::run_sources(args).await,
    };

    if let Err(e) = result {
        eprintln!("tvhub: error: {:#}", e);
        std::process::exit(1);
    }
}

async fn serve(config_path: Option<&std::path::Path>, args: ServeArgs) -> Result<()> {
    let mut settings = Settings::load(config_path)?;
    settings.apply_overrides(&args);

    let store = settings.open_store()?;
    let auth = AuthState::new(settings.auth.secret.clone());

    info!(
        addr = %settings.bind_addr(),
        backend = ?settings.storage.backend,
        db = %settings.storage.path.display(),
        "tvhub starting"
    );
    if store.is_none() {
        warn!("no storage bound; /api/config and /subscribe will answer 500");
    }
    if !auth.is_configured() {
        warn!("no shared secret configured; every /api/config request will be rejected");
    }

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    server::run_server(listener, AppState::new(store, auth))
        .await
        .context("server error")
}
