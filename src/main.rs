//! taskgate - Main Application
//!
//! Fronts a task-management REST API with a forwarding proxy and ships a
//! scripted exerciser for poking the upstream API directly.

use clap::{Parser, Subcommand};
use std::sync::Arc;
use taskgate::{client::run_exercise, config::AppConfig, server::start_server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// taskgate - Forwarding proxy for a task-management API
#[derive(Parser)]
#[command(name = "taskgate")]
#[command(about = "HTTP middleware that fronts a task-management REST API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Server host
    #[arg(long, env = "TASKGATE_SERVER_HOST")]
    host: Option<String>,

    /// Server port
    #[arg(short, long, env = "TASKGATE_SERVER_PORT")]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server
    Serve,
    /// Run the scripted exercise against the upstream API directly
    Exercise {
        /// Upstream base URL (overrides configuration)
        #[arg(short, long)]
        upstream: Option<String>,
    },
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("taskgate={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = if std::path::Path::new(&cli.config).exists() {
        AppConfig::load_from_file(&cli.config).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config file, using defaults");
            AppConfig::default()
        })
    } else {
        AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })
    };

    // Override with CLI args
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Commands::Serve) | None => {
            // Default: start the proxy server
            tracing::info!(
                host = %config.server.host,
                port = %config.server.port,
                upstream = %config.upstream.base_url,
                "Starting taskgate"
            );
            start_server(Arc::new(config)).await?;
        }
        Some(Commands::Exercise { upstream }) => {
            let base_url = upstream.unwrap_or(config.upstream.base_url);
            run_exercise(&base_url).await?;
        }
        Some(Commands::Config) => {
            // Show current configuration
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
