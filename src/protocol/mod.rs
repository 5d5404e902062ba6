//! Protocol Module
//!
//! Defines the wire protocol between `RemoteStore` and `slabpage-server`.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: GET       - Payload: key
//! - 0x02: SET       - Payload: key + flags (1) + ttl_ms (8) + value
//! - 0x03: DEL       - Payload: key
//! - 0x04: PING      - Payload: empty
//! - 0x05: GET_MULTI - Payload: count (4) + keys
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: ERROR
//! - 0x03: NOT_STORED

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType, FLAG_RAW};
pub use response::{Response, Status};
pub use codec::{
    encode_command, decode_command, encode_response, decode_response,
    encode_multi_values, decode_multi_values,
    read_command, write_command, read_response, write_response,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
