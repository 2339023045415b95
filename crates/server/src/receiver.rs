//! Receiver event loop
//!
//! All session state lives in one task. Accept and per-connection tasks
//! own nothing but their socket; they forward transport events into the
//! loop, which applies them strictly one at a time. Per-connection event
//! order is preserved because each connection task sends its events
//! sequentially into the same channel.
//!
//! # Lifecycle
//!
//! `run()` services events while `Running`. A shutdown request unbinds the
//! listener and moves to `Draining`; live connections keep streaming until
//! they close on their own. Once the session table is empty the state is
//! `Stopped` and `run()` returns, which is how the owner observes the end
//! of the receiver's life.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use spool_protocol::{
    LogLevel, LogRecord, ProcessIdentity, HANDSHAKE_READY, HANDSHAKE_REQUEST,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::ReceiverConfig;
use crate::error::{ReceiverError, Result};
use crate::event::ReceiverEvent;
use crate::filter::{RecordFilter, ThreadObserver};
use crate::handle::{Command, ReceiverHandle};
use crate::handshake::{self, Progress};
use crate::metrics::ReceiverMetrics;
use crate::session::{ConnId, Session};

/// Message of the record synthesized when a connection's transport fails
pub const DISCONNECT_MESSAGE: &str = "process connection lost";

/// Transport-side events forwarded to the event loop
enum ConnEvent {
    Accepted {
        stream: TcpStream,
        peer: SocketAddr,
    },
    Data {
        conn: ConnId,
        chunk: Bytes,
    },
    Failed {
        conn: ConnId,
        error: std::io::Error,
    },
    Closed {
        conn: ConnId,
    },
}

/// One live connection: session state plus transport resources
struct Connection {
    session: Session,
    outbound: mpsc::UnboundedSender<&'static [u8]>,
    peer: SocketAddr,
}

struct ListenerTask {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Running,
    Draining,
    Stopped,
}

/// The receiver: owns the live session table, the retired table, the
/// injected filter and thread observer, and the listening endpoint.
pub struct Receiver {
    config: ReceiverConfig,
    sessions: HashMap<ConnId, Connection>,
    retired: HashMap<ProcessIdentity, Session>,
    filter: Box<dyn RecordFilter>,
    observer: Box<dyn ThreadObserver>,
    events: mpsc::UnboundedSender<ReceiverEvent>,
    conn_tx: mpsc::UnboundedSender<ConnEvent>,
    conn_rx: mpsc::UnboundedReceiver<ConnEvent>,
    commands: mpsc::UnboundedReceiver<Command>,
    listener: Option<ListenerTask>,
    metrics: Arc<ReceiverMetrics>,
    state: Lifecycle,
    next_conn: u64,
}

impl Receiver {
    /// Create a receiver with its control handle and output event stream.
    ///
    /// Nothing happens until the returned receiver is `run()` and `listen`
    /// is called on the handle.
    pub fn new(
        config: ReceiverConfig,
        filter: impl RecordFilter + 'static,
        observer: impl ThreadObserver + 'static,
    ) -> (
        Receiver,
        ReceiverHandle,
        mpsc::UnboundedReceiver<ReceiverEvent>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let metrics = Arc::new(ReceiverMetrics::new());
        let handle = ReceiverHandle::new(command_tx, metrics.clone());
        let receiver = Receiver {
            config,
            sessions: HashMap::new(),
            retired: HashMap::new(),
            filter: Box::new(filter),
            observer: Box::new(observer),
            events: events_tx,
            conn_tx,
            conn_rx,
            commands: command_rx,
            listener: None,
            metrics,
            state: Lifecycle::Running,
            next_conn: 0,
        };
        (receiver, handle, events_rx)
    }

    /// Run the event loop until a requested shutdown has drained every
    /// live connection.
    pub async fn run(mut self) {
        info!("receiver running");
        let mut handles_open = true;
        while self.state != Lifecycle::Stopped {
            tokio::select! {
                command = self.commands.recv(), if handles_open => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("all handles dropped");
                        handles_open = false;
                        self.begin_shutdown().await;
                    }
                },
                event = self.conn_rx.recv() => if let Some(event) = event {
                    self.handle_conn_event(event);
                },
            }
        }
        info!("receiver stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Listen {
                address,
                port,
                reply,
            } => {
                let _ = reply.send(self.bind(&address, port).await);
            }
            Command::Reselect {
                identity,
                use_retired,
                done,
            } => {
                self.reselect(&identity, use_retired);
                let _ = done.send(());
            }
            Command::Reload {
                identity,
                use_retired,
                done,
            } => {
                self.reload(&identity, use_retired);
                let _ = done.send(());
            }
            Command::Clear {
                identity,
                use_retired,
                done,
            } => {
                self.clear(&identity, use_retired);
                let _ = done.send(());
            }
            Command::Shutdown => self.begin_shutdown().await,
        }
    }

    fn handle_conn_event(&mut self, event: ConnEvent) {
        match event {
            ConnEvent::Accepted { stream, peer } => self.on_accepted(stream, peer),
            ConnEvent::Data { conn, chunk } => self.on_data(conn, chunk),
            ConnEvent::Failed { conn, error } => self.on_transport_error(conn, error),
            ConnEvent::Closed { conn } => self.on_closed(conn),
        }
    }

    // =========================================================================
    // Listener
    // =========================================================================

    async fn bind(&mut self, address: &str, port: u16) -> Result<SocketAddr> {
        if self.state != Lifecycle::Running {
            return Err(ReceiverError::Stopped);
        }
        self.unbind().await;

        let bind_address = format!("{address}:{port}");
        let listener = TcpListener::bind(&bind_address)
            .await
            .map_err(|source| ReceiverError::Bind {
                address: bind_address,
                source,
            })?;
        let local_addr = listener.local_addr()?;
        let cancel = CancellationToken::new();
        let task = tokio::spawn(accept_loop(listener, self.conn_tx.clone(), cancel.clone()));
        self.listener = Some(ListenerTask {
            cancel,
            task,
            local_addr,
        });
        info!(address = %local_addr, "listening");
        Ok(local_addr)
    }

    async fn unbind(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.cancel.cancel();
            let _ = listener.task.await;
            debug!(address = %listener.local_addr, "listener unbound");
        }
    }

    fn on_accepted(&mut self, stream: TcpStream, peer: SocketAddr) {
        configure_socket(&stream, &self.config);

        let conn = ConnId::new(self.next_conn);
        self.next_conn += 1;

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(connection_task(
            conn,
            stream,
            outbound_rx,
            self.conn_tx.clone(),
            self.config.read_buffer_size,
        ));

        self.sessions.insert(
            conn,
            Connection {
                session: Session::new(),
                outbound: outbound.clone(),
                peer,
            },
        );
        let _ = outbound.send(HANDSHAKE_REQUEST);

        self.metrics.connection_opened();
        debug!(conn = %conn, peer = %peer, "connection accepted");
    }

    // =========================================================================
    // Inbound data
    // =========================================================================

    fn on_data(&mut self, conn: ConnId, chunk: Bytes) {
        self.metrics.bytes_received(chunk.len() as u64);
        let ready = match self.sessions.get(&conn) {
            Some(connection) => connection.session.identity.is_ready(),
            None => return,
        };
        if ready {
            self.on_stream_chunk(conn, &chunk);
        } else {
            self.on_handshake_chunk(conn, &chunk);
        }
    }

    fn on_handshake_chunk(&mut self, conn: ConnId, chunk: &[u8]) {
        let Self {
            sessions,
            events,
            metrics,
            ..
        } = self;
        let Some(connection) = sessions.get_mut(&conn) else {
            return;
        };
        match handshake::absorb(&mut connection.session.identity, chunk) {
            Progress::Completed => {
                let identity = connection.session.identity.clone();
                let _ = connection.outbound.send(HANDSHAKE_READY);
                metrics.handshake_completed();
                info!(conn = %conn, identity = %identity, "client connected");
                let _ = events.send(ReceiverEvent::ClientConnected(identity));
            }
            Progress::NameOnly => {
                trace!(conn = %conn, name = connection.session.identity.name(), "handshake name recorded");
            }
            Progress::Rejected => metrics.handshake_reject(),
        }
    }

    fn on_stream_chunk(&mut self, conn: ConnId, chunk: &[u8]) {
        let Self {
            sessions,
            filter,
            observer,
            events,
            metrics,
            ..
        } = self;
        let Some(connection) = sessions.get_mut(&conn) else {
            return;
        };
        let session = &mut connection.session;
        session.pending.extend_from_slice(chunk);

        while let Some(frame) = session.next_frame() {
            let record = LogRecord::from_wire(&frame);
            if record.message.is_empty() {
                metrics.record_dropped();
                continue;
            }
            metrics.record_parsed();
            ingest(
                session,
                record,
                filter.as_mut(),
                observer.as_mut(),
                events,
                metrics,
            );
        }
    }

    // =========================================================================
    // Errors and disconnects
    // =========================================================================

    fn on_transport_error(&mut self, conn: ConnId, error: std::io::Error) {
        let Self {
            sessions,
            filter,
            events,
            metrics,
            ..
        } = self;
        metrics.transport_error();
        let Some(connection) = sessions.get_mut(&conn) else {
            return;
        };
        let session = &mut connection.session;
        warn!(conn = %conn, identity = %session.identity, error = %error, "transport error");

        let record = LogRecord {
            thread_name: session.identity.name().to_string(),
            thread_id: session.identity.id(),
            level: LogLevel::Error,
            timestamp_ms: LogRecord::timestamp_now(),
            message: DISCONNECT_MESSAGE.to_string(),
            tag: error.to_string(),
        };
        // No thread discovery here: the thread name is the process name.
        session.records.push(record);
        if let Some(record) = session.records.last() {
            offer(session, record, filter.as_mut(), events, metrics);
        }
    }

    fn on_closed(&mut self, conn: ConnId) {
        let Some(connection) = self.sessions.remove(&conn) else {
            return;
        };
        let Connection {
            session,
            outbound,
            peer,
        } = connection;
        let identity = session.identity.clone();
        let _ = self.events.send(ReceiverEvent::ClientClosed(identity.clone()));
        drop(outbound);
        debug!(
            conn = %conn,
            peer = %peer,
            identity = %identity,
            records = session.records.len(),
            "connection closed, session retired"
        );
        // Last write wins: a reconnect's later disconnect replaces the
        // earlier retired history for the same identity.
        self.retired.insert(identity, session);
        self.metrics.connection_closed();
        self.finish_if_drained();
    }

    // =========================================================================
    // Replay operations
    // =========================================================================

    fn reselect(&mut self, identity: &ProcessIdentity, use_retired: bool) {
        let Self {
            sessions,
            retired,
            filter,
            observer,
            events,
            metrics,
            ..
        } = self;
        let Some(session) = find_session(sessions, retired, identity, use_retired) else {
            debug!(identity = %identity, use_retired, "reselect: unknown identity");
            return;
        };
        // Threads replay first so a fresh consumer knows every thread
        // before the first record arrives.
        for name in &session.known_threads {
            observer.on_thread(session, name);
        }
        replay_records(session, filter.as_mut(), events, metrics);
    }

    fn reload(&mut self, identity: &ProcessIdentity, use_retired: bool) {
        let Self {
            sessions,
            retired,
            filter,
            events,
            metrics,
            ..
        } = self;
        let Some(session) = find_session(sessions, retired, identity, use_retired) else {
            debug!(identity = %identity, use_retired, "reload: unknown identity");
            return;
        };
        replay_records(session, filter.as_mut(), events, metrics);
    }

    fn clear(&mut self, identity: &ProcessIdentity, use_retired: bool) {
        let Self {
            sessions, retired, ..
        } = self;
        let Some(session) = find_session(sessions, retired, identity, use_retired) else {
            debug!(identity = %identity, use_retired, "clear: unknown identity");
            return;
        };
        let dropped = session.records.len();
        session.records.clear();
        // known_threads survives a clear.
        debug!(identity = %identity, dropped, "records cleared");
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    async fn begin_shutdown(&mut self) {
        if self.state != Lifecycle::Running {
            return;
        }
        self.unbind().await;
        self.state = Lifecycle::Draining;
        info!(live_sessions = self.sessions.len(), "draining");
        self.finish_if_drained();
    }

    fn finish_if_drained(&mut self) {
        if self.state == Lifecycle::Draining && self.sessions.is_empty() {
            self.state = Lifecycle::Stopped;
        }
    }
}

/// Append a record to the session, run thread discovery, then offer it to
/// the filter.
fn ingest(
    session: &mut Session,
    record: LogRecord,
    filter: &mut dyn RecordFilter,
    observer: &mut dyn ThreadObserver,
    events: &mpsc::UnboundedSender<ReceiverEvent>,
    metrics: &ReceiverMetrics,
) {
    let new_thread = (!record.thread_name.is_empty()
        && !session.known_threads.iter().any(|t| t == &record.thread_name))
    .then(|| record.thread_name.clone());

    session.records.push(record);

    if let Some(name) = new_thread {
        session.known_threads.push(name.clone());
        observer.on_thread(session, &name);
    }

    if let Some(record) = session.records.last() {
        offer(session, record, filter, events, metrics);
    }
}

fn offer(
    session: &Session,
    record: &LogRecord,
    filter: &mut dyn RecordFilter,
    events: &mpsc::UnboundedSender<ReceiverEvent>,
    metrics: &ReceiverMetrics,
) {
    if filter.accept(session, record) {
        metrics.record_accepted();
        let _ = events.send(ReceiverEvent::RecordAccepted(record.clone()));
    }
}

fn replay_records(
    session: &Session,
    filter: &mut dyn RecordFilter,
    events: &mpsc::UnboundedSender<ReceiverEvent>,
    metrics: &ReceiverMetrics,
) {
    for record in &session.records {
        offer(session, record, filter, events, metrics);
    }
}

fn find_session<'t>(
    sessions: &'t mut HashMap<ConnId, Connection>,
    retired: &'t mut HashMap<ProcessIdentity, Session>,
    identity: &ProcessIdentity,
    use_retired: bool,
) -> Option<&'t mut Session> {
    if use_retired {
        retired.get_mut(identity)
    } else {
        // Identity is not the live table's key; the scan stays linear.
        sessions
            .values_mut()
            .map(|connection| &mut connection.session)
            .find(|session| session.identity == *identity)
    }
}

async fn accept_loop(
    listener: TcpListener,
    conn_tx: mpsc::UnboundedSender<ConnEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("accept loop stopped");
                break;
            }
            result = listener.accept() => match result {
                Ok((stream, peer)) => {
                    trace!(peer = %peer, "accepted connection");
                    if conn_tx.send(ConnEvent::Accepted { stream, peer }).is_err() {
                        break;
                    }
                }
                Err(error) => warn!(error = %error, "accept failed"),
            }
        }
    }
}

/// Read loop for one connection. Outbound handshake tokens are interleaved
/// with reads; each successful read forwards one chunk to the event loop.
async fn connection_task(
    conn: ConnId,
    mut stream: TcpStream,
    mut outbound: mpsc::UnboundedReceiver<&'static [u8]>,
    conn_tx: mpsc::UnboundedSender<ConnEvent>,
    read_buffer_size: usize,
) {
    let mut buf = bytes::BytesMut::with_capacity(read_buffer_size);
    loop {
        tokio::select! {
            token = outbound.recv() => match token {
                Some(token) => {
                    if let Err(error) = stream.write_all(token).await {
                        let _ = conn_tx.send(ConnEvent::Failed { conn, error });
                        break;
                    }
                }
                // Sender dropped: the session was already retired.
                None => break,
            },
            result = stream.read_buf(&mut buf) => match result {
                Ok(0) => break,
                Ok(_) => {
                    let chunk = buf.split().freeze();
                    if conn_tx.send(ConnEvent::Data { conn, chunk }).is_err() {
                        return;
                    }
                }
                Err(error) => {
                    let _ = conn_tx.send(ConnEvent::Failed { conn, error });
                    break;
                }
            },
        }
    }
    let _ = conn_tx.send(ConnEvent::Closed { conn });
}

#[cfg(unix)]
fn configure_socket(stream: &TcpStream, config: &ReceiverConfig) {
    use std::os::fd::{AsRawFd, FromRawFd};
    use std::time::Duration;

    // Safety: we borrow the fd for configuration only; the mem::forget
    // below keeps socket2 from closing it while tokio still owns it.
    let fd = stream.as_raw_fd();
    let socket = unsafe { socket2::Socket::from_raw_fd(fd) };

    if config.nodelay && socket.set_tcp_nodelay(true).is_err() {
        debug!("failed to set TCP_NODELAY");
    }

    if config.socket_buffer_size > 0 {
        if let Err(error) = socket.set_recv_buffer_size(config.socket_buffer_size) {
            debug!(error = %error, "failed to set SO_RCVBUF");
        }
        if let Err(error) = socket.set_send_buffer_size(config.socket_buffer_size) {
            debug!(error = %error, "failed to set SO_SNDBUF");
        }
    }

    if config.keepalive {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(Duration::from_secs(60))
            .with_interval(Duration::from_secs(10));
        if let Err(error) = socket.set_tcp_keepalive(&keepalive) {
            debug!(error = %error, "failed to set TCP keepalive");
        }
    }

    std::mem::forget(socket);
}

#[cfg(not(unix))]
fn configure_socket(_stream: &TcpStream, _config: &ReceiverConfig) {}

#[cfg(test)]
#[path = "receiver_test.rs"]
mod tests;
