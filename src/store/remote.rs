//! Remote store
//!
//! `Store` over a single TCP connection to a `slabpage-server`.

use std::collections::HashMap;
use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{Result, SlabError};
use crate::protocol::{
    decode_multi_values, read_response, write_command, Command, Response, Status,
};

use super::{Store, StoreOptions};

/// Keys per GET_MULTI round trip; keeps answers under the frame limit
pub const MULTI_BATCH_KEYS: usize = 32;

/// Buffered halves of one connection
struct Channel {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    /// Set after a failed exchange; the stream may hold a stale response
    broken: bool,
}

impl Channel {
    fn exchange(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }
}

/// Client for a remote slab store
pub struct RemoteStore {
    channel: Mutex<Channel>,
    peer_addr: String,
}

impl RemoteStore {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(backend)?;
        Self::from_stream(stream)
    }

    /// Wrap an established stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        tracing::debug!("Connected to store at {}", peer_addr);

        Ok(Self {
            channel: Mutex::new(Channel {
                reader: BufReader::new(read_stream),
                writer: BufWriter::new(stream),
                broken: false,
            }),
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 = none)
    pub fn set_timeouts(&self, read_ms: u64, write_ms: u64) -> Result<()> {
        let channel = self.channel.lock();
        let read_timeout = (read_ms > 0).then(|| Duration::from_millis(read_ms));
        let write_timeout = (write_ms > 0).then(|| Duration::from_millis(write_ms));
        channel.reader.get_ref().set_read_timeout(read_timeout)?;
        channel.writer.get_ref().set_write_timeout(write_timeout)?;
        Ok(())
    }

    /// Address of the server
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Whether an earlier transport failure has closed this connection
    pub fn is_broken(&self) -> bool {
        self.channel.lock().broken
    }

    /// Health check
    pub fn ping(&self) -> Result<bool> {
        let response = self.call(&Command::Ping)?;
        Ok(response.status == Status::Ok)
    }

    /// Send one command and wait for its response
    ///
    /// Any I/O or framing failure closes the connection for good: responses
    /// carry no request id, so a late answer would be taken for the next one.
    fn call(&self, command: &Command) -> Result<Response> {
        let mut channel = self.channel.lock();
        if channel.broken {
            return Err(SlabError::Backend(format!(
                "connection to {} closed after an earlier failure",
                self.peer_addr
            )));
        }

        let response = match channel.exchange(command) {
            Ok(response) => response,
            Err(e) => {
                channel.broken = true;
                let _ = channel.writer.get_ref().shutdown(Shutdown::Both);
                tracing::warn!("Connection to {} failed, closing it: {}", self.peer_addr, e);
                return Err(backend_from(e));
            }
        };

        if response.status == Status::Error {
            let message = response
                .payload
                .as_deref()
                .map(String::from_utf8_lossy)
                .unwrap_or_default();
            return Err(SlabError::Backend(format!(
                "{} answered error: {}",
                self.peer_addr, message
            )));
        }

        Ok(response)
    }
}

fn backend(err: std::io::Error) -> SlabError {
    SlabError::Backend(err.to_string())
}

fn backend_from(err: SlabError) -> SlabError {
    match err {
        SlabError::Backend(_) => err,
        other => SlabError::Backend(other.to_string()),
    }
}

impl Store for RemoteStore {
    fn write(&self, key: &str, value: &[u8], options: &StoreOptions) -> Result<bool> {
        let command = Command::Set {
            key: key.to_string(),
            value: value.to_vec(),
            raw: options.raw,
            ttl_ms: options
                .expires_in
                .map(|ttl| (ttl.as_millis() as u64).max(1))
                .unwrap_or(0),
        };

        match self.call(&command)?.status {
            Status::Ok => Ok(true),
            Status::NotStored => Ok(false),
            status => Err(SlabError::Protocol(format!(
                "unexpected status {:?} for SET",
                status
            ))),
        }
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let response = self.call(&Command::Get {
            key: key.to_string(),
        })?;

        match response.status {
            Status::Ok => Ok(Some(response.payload.unwrap_or_default())),
            Status::NotFound => Ok(None),
            status => Err(SlabError::Protocol(format!(
                "unexpected status {:?} for GET",
                status
            ))),
        }
    }

    fn read_multi(&self, keys: &[String]) -> Result<HashMap<String, Option<Vec<u8>>>> {
        let mut found = HashMap::with_capacity(keys.len());

        for batch in keys.chunks(MULTI_BATCH_KEYS) {
            let response = self.call(&Command::GetMulti {
                keys: batch.to_vec(),
            })?;

            if response.status != Status::Ok {
                return Err(SlabError::Protocol(format!(
                    "unexpected status {:?} for GET_MULTI",
                    response.status
                )));
            }

            let values = decode_multi_values(response.payload.as_deref().unwrap_or(&[]))?;
            if values.len() != batch.len() {
                return Err(SlabError::Protocol(format!(
                    "GET_MULTI answered {} values for {} keys",
                    values.len(),
                    batch.len()
                )));
            }

            found.extend(batch.iter().cloned().zip(values));
        }

        Ok(found)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let response = self.call(&Command::Delete {
            key: key.to_string(),
        })?;

        match response.status {
            Status::Ok => Ok(true),
            Status::NotFound => Ok(false),
            status => Err(SlabError::Protocol(format!(
                "unexpected status {:?} for DEL",
                status
            ))),
        }
    }
}
