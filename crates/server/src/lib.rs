//! Spool Server - connection, session and replay engine of the spool receiver
//!
//! The receiver accepts TCP connections from log-producing processes,
//! identifies each one through a small handshake, parses the delimited
//! record stream that follows, and keeps the full history per process so it
//! can be replayed later - including after the process disconnected.
//!
//! # Architecture
//!
//! One event-loop task owns all mutable state (live session table, retired
//! table, the injected filter and thread observer). The accept loop and the
//! per-connection tasks never touch that state; they forward transport
//! events over a channel, so every mutation is serialized and no locking is
//! needed. Control operations go through a cloneable [`ReceiverHandle`];
//! accepted output is delivered as [`ReceiverEvent`]s on an unbounded
//! channel.
//!
//! # Example
//!
//! ```ignore
//! use spool_server::{AcceptAll, Receiver, ReceiverConfig, ReceiverEvent};
//!
//! let (receiver, handle, mut events) =
//!     Receiver::new(ReceiverConfig::default(), AcceptAll, |_session, thread: &str| {
//!         println!("new thread: {thread}");
//!     });
//! tokio::spawn(receiver.run());
//!
//! let addr = handle.listen("0.0.0.0", 50100).await?;
//! while let Some(event) = events.recv().await {
//!     if let ReceiverEvent::RecordAccepted(record) = event {
//!         println!("{}: {}", record.thread_name, record.message);
//!     }
//! }
//! ```

mod config;
mod error;
mod event;
mod filter;
mod handle;
mod handshake;
mod metrics;
mod receiver;
mod session;

pub use config::ReceiverConfig;
pub use error::{ReceiverError, Result};
pub use event::ReceiverEvent;
pub use filter::{AcceptAll, RecordFilter, ThreadObserver};
pub use handle::ReceiverHandle;
pub use metrics::{MetricsSnapshot, ReceiverMetrics};
pub use receiver::{Receiver, DISCONNECT_MESSAGE};
pub use session::{ConnId, Session};
