//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool for connections
//! - Commands routed to a shared `Store`

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
