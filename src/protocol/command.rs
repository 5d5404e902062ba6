//! Command definitions
//!
//! Represents commands from clients.

/// SET flag bit: value is an opaque raw blob
pub const FLAG_RAW: u8 = 0x01;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Set = 0x02,
    Delete = 0x03,
    Ping = 0x04,
    GetMulti = 0x05,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Store a value
    Set {
        key: String,
        value: Vec<u8>,
        /// Raw-blob hint from the writer
        raw: bool,
        /// Expiry in milliseconds, 0 = never
        ttl_ms: u64,
    },

    /// Delete a key
    Delete { key: String },

    /// Ping (health check)
    Ping,

    /// Get several keys in one round trip
    GetMulti { keys: Vec<String> },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Delete { .. } => CommandType::Delete,
            Command::Ping => CommandType::Ping,
            Command::GetMulti { .. } => CommandType::GetMulti,
        }
    }
}
