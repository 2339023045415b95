//! Send command - Demo log sender
//!
//! Connects to a running spool server, completes the identity handshake
//! and streams a few batches of records. Useful for exercising
//! `spool serve` end to end.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use spool_protocol::{LogLevel, LogRecord, ProcessHello, RECORD_SEPARATOR};

/// Send command arguments
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:50100")]
    pub server: String,

    /// Process name to announce in the handshake
    #[arg(short, long, default_value = "spool-send")]
    pub name: String,

    /// Number of batches to send
    #[arg(short, long, default_value = "3")]
    pub batches: usize,

    /// Delay between batches (ms)
    #[arg(short, long, default_value = "500")]
    pub delay: u64,
}

/// Run the send command
pub async fn run(args: SendArgs) -> Result<()> {
    println!("Connecting to {}...", args.server);

    let mut stream = TcpStream::connect(&args.server)
        .await
        .with_context(|| format!("failed to connect to {}", args.server))?;

    handshake(&mut stream, &args.name).await?;
    println!("Connected. Sending {} batches...\n", args.batches);

    for i in 0..args.batches {
        let batch = build_batch(i);
        stream
            .write_all(&batch)
            .await
            .context("failed to send batch")?;
        println!("  Sent batch {}", i + 1);

        if i < args.batches - 1 {
            tokio::time::sleep(Duration::from_millis(args.delay)).await;
        }
    }

    stream.flush().await.context("failed to flush")?;
    println!("\nDone. Check the server output.");
    Ok(())
}

/// Answer the server's `who` prompt and wait for `ready`
async fn handshake(stream: &mut TcpStream, name: &str) -> Result<()> {
    read_token(stream).await.context("waiting for who")?;

    let hello = ProcessHello::new(name, i64::from(std::process::id()))
        .to_chunk()
        .context("failed to encode hello")?;
    stream.write_all(&hello).await.context("failed to send hello")?;

    read_token(stream).await.context("waiting for ready")?;
    Ok(())
}

/// Read one short server token (`who` / `ready`)
async fn read_token(stream: &mut TcpStream) -> Result<()> {
    let mut buf = [0u8; 16];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        anyhow::bail!("server closed the connection");
    }
    Ok(())
}

/// Build one batch of encoded records, separators included
fn build_batch(batch_num: usize) -> Vec<u8> {
    let records = [
        record(
            "worker",
            1,
            LogLevel::Info,
            format!("request processed, batch {}", batch_num + 1),
        ),
        record("worker", 1, LogLevel::Debug, "cache hit for session".into()),
        record("auth", 2, LogLevel::Warning, "rate limit approaching".into()),
        record("db", 3, LogLevel::Error, "connection timeout, retrying".into()),
    ];

    let mut bytes = Vec::new();
    for r in &records {
        bytes.extend_from_slice(&r.to_wire());
        bytes.push(RECORD_SEPARATOR);
    }
    bytes
}

fn record(thread: &str, thread_id: i64, level: LogLevel, message: String) -> LogRecord {
    LogRecord {
        thread_name: thread.to_string(),
        thread_id,
        level,
        timestamp_ms: LogRecord::timestamp_now(),
        message,
        tag: String::new(),
    }
}
