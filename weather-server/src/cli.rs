use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use weather_core::{
    Config, HistoryStore, ProviderId, WeatherProvider, provider::default_provider_from_config,
};
use weather_server::{AppState, router, serve, shutdown_signal};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather search history service")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Address to listen on, e.g. "127.0.0.1:8001".
        #[arg(long)]
        bind: Option<String>,
    },

    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve { bind: None }) {
            Command::Serve { bind } => run_server(self.config, bind).await,
            Command::Configure { provider } => configure(self.config, &provider),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_server(config_path: Option<PathBuf>, bind: Option<String>) -> anyhow::Result<()> {
    let mut config = load_config(config_path.as_ref())?;
    config.apply_env();
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    let configured: Vec<&str> = config.configured_providers().iter().map(|id| id.as_str()).collect();
    tracing::info!(providers = ?configured, "Configured weather providers");

    let provider: Arc<dyn WeatherProvider> = Arc::from(default_provider_from_config(&config)?);
    if provider.is_simulated() {
        tracing::warn!("No weather provider configured, searches will return simulated data");
    }

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?;

    let state = AppState::new(Arc::new(HistoryStore::new()), provider.clone());
    let app = router(state, &config.server);

    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!(%addr, provider = %provider.id(), "Weather search history server listening");

    serve(listener, app, shutdown_signal()).await
}

fn configure(config_path: Option<PathBuf>, provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    if !id.requires_api_key() {
        bail!("Provider '{id}' does not need configuration.");
    }

    let mut config = load_config(config_path.as_ref())?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key must not be empty.");
    }

    config.upsert_provider_api_key(id, api_key);

    if config.default_provider_id()? != id {
        let make_default = Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;

        if make_default {
            config.set_default_provider(id);
        }
    }

    let path = match config_path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => {
            config.save()?;
            Config::config_file_path()?
        }
    };

    println!("Saved {id} configuration to {}", path.display());
    Ok(())
}
