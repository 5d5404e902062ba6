//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};

use crate::config::Config;
use crate::error::Result;
use crate::store::SharedStore;

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Cloneable handle that stops a running server
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// TCP server exposing a store
///
/// ## Threading
/// - The thread calling `run` accepts connections (non-blocking, polling the
///   shutdown flag)
/// - Accepted streams go through a bounded crossbeam channel
///   (capacity `max_connections`) to `worker_threads` workers
/// - Each worker serves one connection at a time until the client leaves
pub struct Server {
    config: Config,
    store: SharedStore,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listen address from the config
    pub fn bind(config: Config, store: SharedStore) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            store,
            listener,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        let (sender, receiver) = channel::bounded::<TcpStream>(self.config.max_connections);

        let workers: Vec<JoinHandle<()>> = (0..self.config.worker_threads)
            .map(|id| self.spawn_worker(id, receiver.clone()))
            .collect::<std::io::Result<_>>()?;

        let result = self.accept_loop(&sender);

        // Closing the channel lets idle workers exit
        drop(sender);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Connection worker panicked");
            }
        }

        result
    }

    fn accept_loop(&self, sender: &Sender<TcpStream>) -> Result<()> {
        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    stream.set_nonblocking(false)?;
                    match sender.try_send(stream) {
                        Ok(()) => tracing::trace!("Queued connection from {}", peer),
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!("Connection queue full, dropping {}", peer);
                        }
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::error!("Accept failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        tracing::info!("Server shutting down");
        Ok(())
    }

    fn spawn_worker(
        &self,
        id: usize,
        receiver: Receiver<TcpStream>,
    ) -> std::io::Result<JoinHandle<()>> {
        let store = Arc::clone(&self.store);
        let read_timeout_ms = self.config.read_timeout_ms;
        let write_timeout_ms = self.config.write_timeout_ms;

        thread::Builder::new()
            .name(format!("slabpage-worker-{}", id))
            .spawn(move || {
                for stream in receiver.iter() {
                    let mut connection = match Connection::new(stream, Arc::clone(&store)) {
                        Ok(connection) => connection,
                        Err(e) => {
                            tracing::warn!("Failed to set up connection: {}", e);
                            continue;
                        }
                    };

                    if let Err(e) = connection.set_timeouts(read_timeout_ms, write_timeout_ms) {
                        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
                    }

                    if let Err(e) = connection.handle() {
                        tracing::debug!("Connection {} closed with error: {}", connection.peer_addr(), e);
                    }
                }
            })
    }
}
