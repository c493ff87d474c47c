//! TCP Server
//!
//! Accepts connections and runs each on its own worker thread.

use std::io::{ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::database::Database;
use crate::error::{DbError, Result};
use crate::protocol::ERROR_PREFIX;

use super::Connection;

/// How long the accept loop sleeps when no client is waiting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// TCP server for pagedb
pub struct Server {
    config: Config,
    database: Arc<Database>,
    listener: TcpListener,

    /// Set to stop the accept loop
    shutdown: Arc<AtomicBool>,

    /// Live connection workers
    active: Arc<AtomicUsize>,

    /// Used to name worker threads
    next_conn_id: AtomicU64,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, database: Arc<Database>) -> Result<Self> {
        if config.max_connections == 0 {
            return Err(DbError::Config("max_connections must be at least 1".to_string()));
        }

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            database,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            next_conn_id: AtomicU64::new(1),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` is called (blocking)
    pub fn run(&self) -> Result<()> {
        while !self.shutdown.load(Ordering::Acquire) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if let Err(e) = self.dispatch(stream) {
                        tracing::warn!("Failed to start worker for {}: {}", addr, e);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::error!("Error accepting connection: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!("Server shutting down");
        Ok(())
    }

    /// Signal the accept loop to stop
    ///
    /// Workers already running finish their connections.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Shared flag that stops the accept loop when set
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    fn dispatch(&self, mut stream: TcpStream) -> Result<()> {
        stream.set_nonblocking(false)?;

        let previous = self.active.fetch_add(1, Ordering::AcqRel);
        let slot = ActiveSlot(Arc::clone(&self.active));
        if previous >= self.config.max_connections {
            tracing::warn!(
                "Connection limit ({}) reached, refusing client",
                self.config.max_connections
            );
            let _ = writeln!(stream, "{}too many connections", ERROR_PREFIX);
            drop(slot);
            return Ok(());
        }

        let mut connection = Connection::new(stream, Arc::clone(&self.database))?;
        connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;

        let id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        thread::Builder::new()
            .name(format!("pagedb-conn-{}", id))
            .spawn(move || {
                let _slot = slot;
                if let Err(e) = connection.handle() {
                    tracing::warn!(
                        "Connection {} ended with error: {}",
                        connection.peer_addr(),
                        e
                    );
                }
            })?;
        Ok(())
    }
}

/// Releases a connection slot when the worker exits
struct ActiveSlot(Arc<AtomicUsize>);

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
