//! Static server lifecycle.
//!
//! [`StaticServer`] owns the listening socket and the background accept
//! loop. The lifecycle is `stopped → running → stopped`: `bind` constructs
//! with the socket bound but not yet accepting, `start` schedules the accept
//! loop on the runtime and returns immediately, `stop` signals the loop and
//! waits for it to release the socket. One instance serves one test session;
//! restarting a stopped instance is not supported.

mod connection;
mod listener;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::logger;
use crate::resolver::RouteTable;

/// Per-request options fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub access_log: bool,
    /// Access log format (`common` or `combined`); empty means `common`.
    pub access_log_format: String,
}

/// Immutable state shared by every request task.
///
/// No writer exists after construction, so requests read it without
/// synchronization.
#[derive(Debug)]
pub struct ServerState {
    pub routes: RouteTable,
    pub access_log: bool,
    pub access_log_format: String,
}

/// Static file server bound to one port for the duration of a test session.
pub struct StaticServer {
    local_addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown: Arc<Notify>,
    listener: Option<TcpListener>,
    handle: Option<JoinHandle<()>>,
}

impl StaticServer {
    /// Bind a listening socket on `port` across all interfaces.
    ///
    /// The socket is bound but not yet accepting; call [`start`] for that.
    /// Port 0 requests an ephemeral port, reported by [`local_addr`].
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for an empty route table, [`Error::Bind`] when the
    /// port is taken or the process lacks permission.
    ///
    /// [`start`]: StaticServer::start
    /// [`local_addr`]: StaticServer::local_addr
    pub fn bind(port: u16, routes: RouteTable, options: ServeOptions) -> Result<Self, Error> {
        if routes.is_empty() {
            return Err(Error::Config("route table is empty".to_string()));
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener =
            listener::bind_listener(addr).map_err(|source| Error::Bind { port, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| Error::Bind { port, source })?;

        let state = Arc::new(ServerState {
            routes,
            access_log: options.access_log,
            access_log_format: options.access_log_format,
        });

        Ok(Self {
            local_addr,
            state,
            shutdown: Arc::new(Notify::new()),
            listener: Some(listener),
            handle: None,
        })
    }

    /// The address the listening socket is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The bound port (the actual one when constructed with port 0).
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Whether the accept loop is currently scheduled.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Begin accepting connections on a background task.
    ///
    /// Returns as soon as the loop is scheduled; the caller is free to go
    /// launch the test-runner process.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`] if the loop is already scheduled,
    /// [`Error::NotRunning`] if this instance was already stopped (one
    /// serving period per instance).
    pub fn start(&mut self) -> Result<(), Error> {
        if self.handle.is_some() {
            return Err(Error::AlreadyRunning);
        }
        let listener = self.listener.take().ok_or(Error::NotRunning)?;
        let state = Arc::clone(&self.state);
        let shutdown = Arc::clone(&self.shutdown);
        self.handle = Some(tokio::spawn(serve_loop(listener, state, shutdown)));
        Ok(())
    }

    /// Signal the accept loop to terminate and wait for the socket to be
    /// released.
    ///
    /// In-flight request tasks may be cut short; none of them hold the
    /// listening socket, so the port is free once this returns.
    ///
    /// # Errors
    ///
    /// [`Error::NotRunning`] when the server is already stopped.
    pub async fn stop(&mut self) -> Result<(), Error> {
        let handle = self.handle.take().ok_or(Error::NotRunning)?;
        self.shutdown.notify_one();
        if handle.await.is_err() {
            logger::log_error("Serving loop panicked before shutdown");
        }
        logger::log_server_stop(&self.local_addr);
        Ok(())
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        // Best-effort: let an abandoned loop wind down on its own.
        if self.handle.is_some() {
            self.shutdown.notify_one();
        }
    }
}

/// Accept/serve loop: runs until the shutdown signal fires.
///
/// Accept errors are logged and the loop keeps going; only the shutdown
/// signal ends a serving period. Dropping the listener on the way out
/// releases the port before `stop()` returns.
async fn serve_loop(listener: TcpListener, state: Arc<ServerState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => break,
        }
    }

    drop(listener);
}
