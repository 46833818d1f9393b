mod config_cmd;
mod status_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use facegate_config::FaceGateConfig;
use facegate_gateway::{start_server, GatewayState};
use facegate_logging::{bootstrap_logger, init_logger, redact_sensitive_data};
use facegate_relay::WebhookRelay;
use facegate_understanding::build_analyzer;

#[derive(Parser)]
#[command(name = "facegate")]
#[command(about = "FaceGate: face attribute analysis over HTTP")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, global = true, env = "FACEGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running server's health endpoint
    Status,
    /// Print the effective configuration with secrets masked
    Config {
        /// Write a config file with default values if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| facegate_config::config_file_path(&facegate_config::config_dir()));

    let bootstrap = bootstrap_logger();

    if let Commands::Config { init: true } = cli.command {
        return config_cmd::init(&config_path).await;
    }

    let config = facegate_config::load_and_prepare(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    drop(bootstrap);
    init_logger(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Status => status_cmd::run(&config).await?,
        Commands::Config { .. } => config_cmd::show(&config)?,
    }

    Ok(())
}

async fn run_server(config: FaceGateConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.bind, config.server.port
            )
        })?;

    let analyzer = build_analyzer(&config.analyzer)?;
    info!(
        backend = %config.analyzer.backend,
        analyzer = analyzer.name(),
        url = %redact_sensitive_data(&config.analyzer.base_url),
        "Configured face analyzer"
    );

    let relay = WebhookRelay::from_config(&config.relay)?;
    match &relay {
        Some(relay) => info!(
            endpoint = %redact_sensitive_data(relay.endpoint()),
            timeout_secs = config.relay.timeout_secs,
            "Emotion relay enabled"
        ),
        None => info!("Emotion relay disabled"),
    }

    info!(
        addr = %addr,
        temp_dir = %config.storage.temp_dir.display(),
        static_dir = %config.server.static_dir.display(),
        "Starting FaceGate"
    );

    start_server(addr, GatewayState::new(config, analyzer, relay)).await
}
