//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:       key_len (4 bytes) + key
//! - SET:       key_len (4 bytes) + key + flags (1) + ttl_ms (8) + value
//! - DELETE:    key_len (4 bytes) + key
//! - PING:      empty
//! - GET_MULTI: count (4) + count * (key_len (4) + key)
//!
//! ### GET_MULTI Response Payload
//! ```text
//! count (4) + count * ( present (1) [+ value_len (4) + value] )
//! ```
//! Values come back in request order.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, SlabError};
use super::command::FLAG_RAW;
use super::{Command, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (64 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

// =============================================================================
// Field helpers
// =============================================================================

fn put_key(buf: &mut BytesMut, key: &str) {
    buf.put_u32(key.len() as u32);
    buf.put_slice(key.as_bytes());
}

fn get_key(buf: &mut &[u8], what: &str) -> Result<String> {
    if buf.remaining() < 4 {
        return Err(SlabError::Protocol(format!("{}: missing key length", what)));
    }
    let key_len = buf.get_u32() as usize;

    if buf.remaining() < key_len {
        return Err(SlabError::Protocol(format!(
            "{}: incomplete key (expected {}, got {})",
            what,
            key_len,
            buf.remaining()
        )));
    }

    let key = String::from_utf8(buf[..key_len].to_vec())
        .map_err(|_| SlabError::Protocol(format!("{}: key is not valid UTF-8", what)))?;
    buf.advance(key_len);
    Ok(key)
}

/// Parse the 5-byte frame header, returning (tag, payload_len)
fn parse_header(bytes: &[u8], what: &str) -> Result<(u8, usize)> {
    if bytes.len() < HEADER_SIZE {
        return Err(SlabError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let tag = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(SlabError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    Ok((tag, payload_len))
}

fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(tag);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message.to_vec()
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Vec<u8> {
    let mut payload = BytesMut::new();

    match command {
        Command::Get { key } | Command::Delete { key } => put_key(&mut payload, key),
        Command::Set {
            key,
            value,
            raw,
            ttl_ms,
        } => {
            payload.reserve(4 + key.len() + 1 + 8 + value.len());
            put_key(&mut payload, key);
            payload.put_u8(if *raw { FLAG_RAW } else { 0 });
            payload.put_u64(*ttl_ms);
            payload.put_slice(value);
        }
        Command::Ping => {}
        Command::GetMulti { keys } => {
            payload.put_u32(keys.len() as u32);
            for key in keys {
                put_key(&mut payload, key);
            }
        }
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_type, payload_len) = parse_header(bytes, "command")?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(SlabError::Protocol(format!(
            "Incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let mut payload = &bytes[HEADER_SIZE..total_len];

    // Parse command based on type
    match cmd_type {
        0x01 => Ok(Command::Get {
            key: get_key(&mut payload, "GET command")?,
        }),
        0x02 => decode_set_command(payload),
        0x03 => Ok(Command::Delete {
            key: get_key(&mut payload, "DELETE command")?,
        }),
        0x04 => decode_ping_command(payload),
        0x05 => decode_get_multi_command(payload),
        _ => Err(SlabError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

/// Decode SET command payload
fn decode_set_command(mut payload: &[u8]) -> Result<Command> {
    let key = get_key(&mut payload, "SET command")?;

    if payload.remaining() < 9 {
        return Err(SlabError::Protocol(
            "SET command: missing flags or ttl".to_string(),
        ));
    }
    let flags = payload.get_u8();
    let ttl_ms = payload.get_u64();

    Ok(Command::Set {
        key,
        value: payload.to_vec(),
        raw: flags & FLAG_RAW != 0,
        ttl_ms,
    })
}

/// Decode PING command payload
fn decode_ping_command(payload: &[u8]) -> Result<Command> {
    if !payload.is_empty() {
        return Err(SlabError::Protocol(format!(
            "PING command: unexpected payload of {} bytes",
            payload.len()
        )));
    }
    Ok(Command::Ping)
}

/// Decode GET_MULTI command payload
fn decode_get_multi_command(mut payload: &[u8]) -> Result<Command> {
    if payload.remaining() < 4 {
        return Err(SlabError::Protocol(
            "GET_MULTI command: missing key count".to_string(),
        ));
    }
    let count = payload.get_u32() as usize;

    let mut keys = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        keys.push(get_key(&mut payload, "GET_MULTI command")?);
    }

    Ok(Command::GetMulti { keys })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload_len) = parse_header(bytes, "response")?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(SlabError::Protocol(format!(
            "Incomplete response payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    // Parse status
    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        0x03 => Status::NotStored,
        _ => {
            return Err(SlabError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    // Extract payload
    let payload = if payload_len > 0 {
        Some(bytes[HEADER_SIZE..total_len].to_vec())
    } else {
        None
    };

    Ok(Response { status, payload })
}

/// Encode the values of a GET_MULTI answer, in request order
pub fn encode_multi_values(values: &[Option<Vec<u8>>]) -> Vec<u8> {
    let mut payload = BytesMut::new();
    payload.put_u32(values.len() as u32);

    for value in values {
        match value {
            Some(value) => {
                payload.put_u8(1);
                payload.put_u32(value.len() as u32);
                payload.put_slice(value);
            }
            None => payload.put_u8(0),
        }
    }

    payload.to_vec()
}

/// Decode the values of a GET_MULTI answer
pub fn decode_multi_values(mut payload: &[u8]) -> Result<Vec<Option<Vec<u8>>>> {
    if payload.remaining() < 4 {
        return Err(SlabError::Protocol(
            "GET_MULTI response: missing value count".to_string(),
        ));
    }
    let count = payload.get_u32() as usize;

    let mut values = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        if !payload.has_remaining() {
            return Err(SlabError::Protocol(format!(
                "GET_MULTI response: truncated at value {}",
                index
            )));
        }

        if payload.get_u8() == 0 {
            values.push(None);
            continue;
        }

        if payload.remaining() < 4 {
            return Err(SlabError::Protocol(format!(
                "GET_MULTI response: missing length of value {}",
                index
            )));
        }
        let len = payload.get_u32() as usize;
        if payload.remaining() < len {
            return Err(SlabError::Protocol(format!(
                "GET_MULTI response: value {} truncated (expected {}, got {})",
                index,
                len,
                payload.remaining()
            )));
        }
        values.push(Some(payload[..len].to_vec()));
        payload.advance(len);
    }

    Ok(values)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R, what: &str) -> Result<Vec<u8>> {
    // Read header first
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let (_, payload_len) = parse_header(&header, what)?;

    // Combine header and payload
    let mut full_message = vec![0u8; HEADER_SIZE + payload_len];
    full_message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut full_message[HEADER_SIZE..])?;
    }

    Ok(full_message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader, "command")?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader, "response")?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
