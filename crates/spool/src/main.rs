//! Spool - Process log ingestion server
//!
//! # Usage
//!
//! ```bash
//! # Run the server (default)
//! spool
//! spool --config configs/config.toml
//!
//! # Send demo records to a running server
//! spool send
//! spool send --server 127.0.0.1:50100 --batches 5
//! ```

mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spool_config::{Config, LogFormat};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Spool - Process log ingestion server
#[derive(Parser, Debug)]
#[command(name = "spool")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Global args that apply to serve when no subcommand given
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the log receiver server
    Serve(cmd::serve::ServeArgs),

    /// Send demo records to a running server
    Send(cmd::send::SendArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Explicit subcommand
        Some(Command::Serve(mut args)) => {
            // CLI global --config overrides subcommand config if both specified
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let (level, format) =
                resolve_log_settings(cli.log_level.as_deref(), args.config.as_deref());
            init_logging(&level, format)?;
            cmd::serve::run(args).await
        }
        Some(Command::Send(args)) => {
            let (level, format) = resolve_log_settings(cli.log_level.as_deref(), None);
            init_logging(&level, format)?;
            cmd::send::run(args).await
        }
        // No subcommand = run server (default behavior)
        None => {
            let (level, format) =
                resolve_log_settings(cli.log_level.as_deref(), cli.config.as_deref());
            init_logging(&level, format)?;
            let args = cmd::serve::ServeArgs {
                config: cli.config,
                no_color: false,
            };
            cmd::serve::run(args).await
        }
    }
}

/// Resolve log settings: CLI flag > config file > defaults
fn resolve_log_settings(
    cli_level: Option<&str>,
    config_path: Option<&std::path::Path>,
) -> (String, LogFormat) {
    let mut level = cli_level.map(str::to_string);
    let mut format = LogFormat::Console;

    if let Some(path) = config_path {
        if path.exists() {
            if let Ok(config) = Config::from_file(path) {
                if level.is_none() {
                    level = Some(config.log.level.as_str().to_string());
                }
                format = config.log.format;
            }
        }
    }

    (level.unwrap_or_else(|| "info".to_string()), format)
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    match format {
        LogFormat::Console => tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
    }

    Ok(())
}
