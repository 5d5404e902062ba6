//! slabpage Server Binary
//!
//! Serves an in-memory slab-limited store over TCP.

use std::sync::Arc;

use clap::Parser;
use slabpage::network::Server;
use slabpage::store::SharedStore;
use slabpage::{Config, MemoryStore};
use tracing_subscriber::{fmt, EnvFilter};

/// slabpage Server
#[derive(Parser, Debug)]
#[command(name = "slabpage-server")]
#[command(about = "In-memory slab-limited key-value store")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:11311")]
    listen: String,

    /// Largest entry (key + value) accepted, in bytes
    #[arg(short = 's', long, default_value = "1048576")]
    max_entry_size: usize,

    /// Connection worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Maximum queued connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slabpage=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("slabpage Server v{}", slabpage::VERSION);
    tracing::info!("Entry size limit: {} bytes", args.max_entry_size);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_entry_size(args.max_entry_size)
        .worker_threads(args.workers)
        .max_connections(args.max_connections)
        .build();

    let store: SharedStore = Arc::new(MemoryStore::new(config.max_entry_size));

    let server = match Server::bind(config, store) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
