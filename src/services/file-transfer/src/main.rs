use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use file_transfer::{build_router, config_types::LoggingConfig, AppState, FileTransferConfig};

/// Command line overrides, applied on top of file and environment configuration
#[derive(Parser, Debug)]
#[command(name = "file-transfer", version, about = "LAN file transfer server")]
struct Args {
    /// Config file path without extension
    #[arg(short, long, env = "FILE_TRANSFER_CONFIG")]
    config: Option<String>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory uploaded files are stored in
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

/// Main application entry point
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = FileTransferConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(upload_dir) = args.upload_dir {
        config.storage.upload_dir = upload_dir;
    }

    init_tracing(&config.logging);

    info!(
        "Starting FileFlow File Transfer Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    let state = AppState::new(config)
        .await
        .context("Failed to initialize storage directory")?;

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("File Transfer Service listening on {}", addr);
    info!("Local access: http://localhost:{}", addr.port());
    info!("Other devices on the same network: http://<this machine's IP>:{}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("File Transfer Service shutting down");
    Ok(())
}

/// Initialize tracing, preferring `RUST_LOG` over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "file_transfer={},tower_http=debug",
            logging.level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
