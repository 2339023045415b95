//! Serve command - Run the spool receiver

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::signal;
use tracing::{debug, error, info};

use spool_config::Config;
use spool_server::{AcceptAll, Receiver, ReceiverConfig, ReceiverEvent, Session};

use crate::output::RecordPrinter;

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file (defaults to configs/config.toml if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable colored record output
    #[arg(long)]
    pub no_color: bool,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let config_path = args
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        config = %config_path,
        "spool starting"
    );

    // Load configuration
    let config = match args.config {
        Some(path) => {
            // User explicitly provided config path - must exist
            if !path.exists() {
                return Err(anyhow::anyhow!("config file not found: {}", path.display()));
            }
            Config::from_file(&path).context("failed to load configuration")?
        }
        None => {
            // No config provided - try default paths, fall back to defaults
            let default_paths = [
                PathBuf::from("configs/config.toml"),
                PathBuf::from("config.toml"),
            ];

            let mut loaded = None;
            for path in &default_paths {
                if path.exists() {
                    info!(config = %path.display(), "using config file");
                    loaded = Some(Config::from_file(path).context("failed to load configuration")?);
                    break;
                }
            }

            loaded.unwrap_or_else(|| {
                info!("no config file found, using defaults (listening on port 50100)");
                Config::default()
            })
        }
    };

    // Run the server
    if let Err(e) = run_server(config, !args.no_color).await {
        error!(error = %e, "server error");
        return Err(e);
    }

    info!("spool shutdown complete");
    Ok(())
}

/// Main server run loop
async fn run_server(config: Config, color: bool) -> Result<()> {
    let receiver_config = ReceiverConfig {
        read_buffer_size: config.listener.read_buffer_size,
        nodelay: config.listener.nodelay,
        keepalive: config.listener.keepalive,
        socket_buffer_size: config.listener.socket_buffer_size,
    };

    // Discovered thread names go to the debug log; accepted records print below.
    let observer = |session: &Session, thread: &str| {
        debug!(process = %session.identity, thread = %thread, "thread discovered");
    };

    let (receiver, handle, mut events) = Receiver::new(receiver_config, AcceptAll, observer);
    let receiver_task = tokio::spawn(receiver.run());

    let bound = handle
        .listen(config.listener.address.clone(), config.listener.port)
        .await
        .context("failed to start listener")?;

    info!(address = %bound, "spool server running");

    // Trigger a graceful drain on the first shutdown signal.
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        wait_for_shutdown().await;
        info!("shutdown signal received, draining connections...");
        shutdown_handle.shutdown();
    });

    // The event stream ends once the receiver has fully drained.
    let printer = RecordPrinter::new(color);
    while let Some(event) = events.recv().await {
        match event {
            ReceiverEvent::RecordAccepted(record) => printer.print(&record),
            ReceiverEvent::ClientConnected(identity) => {
                info!(process = %identity, "process connected");
            }
            ReceiverEvent::ClientClosed(identity) => {
                info!(process = %identity, "process disconnected");
            }
        }
    }

    receiver_task.await.context("receiver task panicked")?;

    let metrics = handle.metrics();
    info!(
        connections = metrics.connections_total,
        records = metrics.records_accepted,
        bytes = metrics.bytes_received,
        "receiver finished"
    );

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
