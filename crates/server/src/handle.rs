//! Control surface for a running receiver
//!
//! A handle is cheap to clone and safe to use from any task. Every method
//! sends a command to the event loop and, except for `shutdown`, waits for
//! the loop iteration that serviced it, so callers observe the same
//! call-returns-after-effect semantics a direct method call would have.

use std::net::SocketAddr;
use std::sync::Arc;

use spool_protocol::ProcessIdentity;
use tokio::sync::{mpsc, oneshot};

use crate::error::{ReceiverError, Result};
use crate::metrics::{MetricsSnapshot, ReceiverMetrics};

pub(crate) enum Command {
    Listen {
        address: String,
        port: u16,
        reply: oneshot::Sender<Result<SocketAddr>>,
    },
    Reselect {
        identity: ProcessIdentity,
        use_retired: bool,
        done: oneshot::Sender<()>,
    },
    Reload {
        identity: ProcessIdentity,
        use_retired: bool,
        done: oneshot::Sender<()>,
    },
    Clear {
        identity: ProcessIdentity,
        use_retired: bool,
        done: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Cloneable handle to a [`Receiver`](crate::Receiver) event loop
#[derive(Clone)]
pub struct ReceiverHandle {
    commands: mpsc::UnboundedSender<Command>,
    metrics: Arc<ReceiverMetrics>,
}

impl ReceiverHandle {
    pub(crate) fn new(
        commands: mpsc::UnboundedSender<Command>,
        metrics: Arc<ReceiverMetrics>,
    ) -> Self {
        ReceiverHandle { commands, metrics }
    }

    /// Bind the listening endpoint, unbinding any previous one first.
    ///
    /// Returns the bound local address, so `port` may be 0 to let the OS
    /// pick one. Fails with [`ReceiverError::Stopped`] once the receiver is
    /// draining or gone.
    pub async fn listen(&self, address: impl Into<String>, port: u16) -> Result<SocketAddr> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Listen {
                address: address.into(),
                port,
                reply,
            })
            .map_err(|_| ReceiverError::Stopped)?;
        rx.await.map_err(|_| ReceiverError::Stopped)?
    }

    /// Replay a session's known thread names, then all its records,
    /// through the discovery/filter/emit path. Unknown identity: no-op.
    pub async fn reselect(&self, identity: ProcessIdentity, use_retired: bool) -> Result<()> {
        self.acked(|done| Command::Reselect {
            identity,
            use_retired,
            done,
        })
        .await
    }

    /// Replay only a session's records through the filter/emit path.
    /// Unknown identity: no-op.
    pub async fn reload(&self, identity: ProcessIdentity, use_retired: bool) -> Result<()> {
        self.acked(|done| Command::Reload {
            identity,
            use_retired,
            done,
        })
        .await
    }

    /// Drop a session's stored records, keeping its known thread names.
    /// Unknown identity: no-op.
    pub async fn clear(&self, identity: ProcessIdentity, use_retired: bool) -> Result<()> {
        self.acked(|done| Command::Clear {
            identity,
            use_retired,
            done,
        })
        .await
    }

    /// Ask the receiver to stop listening and drain: its `run()` returns
    /// once the last live connection has closed. Never blocks.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    /// Current counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn acked(&self, command: impl FnOnce(oneshot::Sender<()>) -> Command) -> Result<()> {
        let (done, rx) = oneshot::channel();
        self.commands
            .send(command(done))
            .map_err(|_| ReceiverError::Stopped)?;
        rx.await.map_err(|_| ReceiverError::Stopped)
    }
}
