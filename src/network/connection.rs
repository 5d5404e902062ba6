//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{Result, SlabError};
use crate::protocol::{encode_multi_values, read_command, write_response, Command, Response};
use crate::store::{SharedStore, StoreOptions};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Store commands are executed against
    store: SharedStore,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(stream: TcpStream, store: SharedStore) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            store,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and sends responses.
    /// Returns when the client disconnects or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            // Read next command
            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(SlabError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(SlabError::Io(ref e))
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
                {
                    // Windows reports TimedOut where Unix reports WouldBlock
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    // Send error response if possible
                    let _ = self.send_response(Response::error(&e.to_string()));
                    return Err(e);
                }
            };

            tracing::trace!("Received {:?} from {}", command.command_type(), self.peer_addr);

            // Execute command
            let response = self.execute_command(command);

            // Send response
            if let Err(e) = self.send_response(response) {
                if let SlabError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr, e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Execute a command and return a response
    fn execute_command(&self, command: Command) -> Response {
        let result = match command {
            Command::Get { key } => self.store.read(&key).map(|value| match value {
                Some(value) => Response::ok(Some(value)),
                None => Response::not_found(),
            }),
            Command::Set {
                key,
                value,
                raw,
                ttl_ms,
            } => {
                let options = StoreOptions {
                    raw,
                    expires_in: (ttl_ms > 0).then(|| Duration::from_millis(ttl_ms)),
                };
                self.store.write(&key, &value, &options).map(|stored| {
                    if stored {
                        Response::ok(None)
                    } else {
                        Response::not_stored()
                    }
                })
            }
            Command::Delete { key } => self.store.delete(&key).map(|existed| {
                if existed {
                    Response::ok(None)
                } else {
                    Response::not_found()
                }
            }),
            Command::Ping => Ok(Response::ok(Some(b"PONG".to_vec()))),
            Command::GetMulti { keys } => self.store.read_multi(&keys).map(|found| {
                let values: Vec<Option<Vec<u8>>> = keys
                    .iter()
                    .map(|key| found.get(key).cloned().flatten())
                    .collect();
                Response::ok(Some(encode_multi_values(&values)))
            }),
        };

        result.unwrap_or_else(|e| Response::error(&e.to_string()))
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)?;
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
    )
}
