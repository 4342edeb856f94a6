// emopoem - image-to-poem relay over a multimodal completion API

use anyhow::{Context, Result};
use clap::Parser;
use emopoem::cli::Args;
use emopoem::config::AppConfig;
use emopoem::openai::OpenAiClient;
use emopoem::relay::InferenceRelay;
use emopoem::server::create_router;
use emopoem::utils::logging;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting emopoem v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    // Phase 3: Build the upstream client once; handlers share it read-only
    let api_key = config
        .openai
        .api_key
        .take()
        .context("API key missing after validation")?;
    let client = OpenAiClient::new(&config.openai, api_key)?;
    info!("Upstream: {} (model {})", client.base_url(), client.model());
    let relay = InferenceRelay::new(client);

    // Phase 4: Build and start HTTP server
    let app = create_router(&config, relay)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
