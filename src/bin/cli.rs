//! slabpage CLI Client
//!
//! Command-line interface for storing large values through a slabpage server.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use slabpage::{Config, PageMode, PagedCache, RemoteStore, Result, WriteOptions};
use tracing_subscriber::{fmt, EnvFilter};

/// slabpage CLI
#[derive(Parser, Debug)]
#[command(name = "slabpage-cli")]
#[command(about = "CLI for storing oversized values on a slab-limited store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:11311")]
    server: String,

    /// Server's entry size limit, in bytes
    #[arg(long, default_value = "1048576")]
    max_entry_size: usize,

    /// Per-entry header overhead, in bytes
    #[arg(long, default_value = "100")]
    header_overhead: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,

        /// Write the value to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        #[arg(required_unless_present = "file")]
        value: Option<String>,

        /// Read the value from a file
        #[arg(short, long, conflicts_with = "value")]
        file: Option<PathBuf>,

        /// Compress before paging
        #[arg(short, long)]
        compress: bool,

        /// Expire after this many seconds
        #[arg(short, long)]
        ttl: Option<u64>,
    },

    /// Delete a key's manifest
    Del {
        /// The key to delete
        key: String,
    },

    /// Delete a key's manifest and all of its pages
    DelAll {
        /// The key to delete
        key: String,
    },

    /// Show how a key is paged
    Info {
        /// The key to inspect
        key: String,
    },

    /// Ping the server
    Ping,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = Config::builder()
        .max_entry_size(args.max_entry_size)
        .header_overhead(args.header_overhead)
        .build();

    let store = RemoteStore::connect(args.server.as_str())?;
    store.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;

    let cache = PagedCache::with_config(store, config)?;

    match args.command {
        Commands::Get { key, out } => match cache.read::<Vec<u8>>(&key)? {
            Some(value) => {
                match out {
                    Some(path) => fs::write(path, &value)?,
                    None => println!("{}", String::from_utf8_lossy(&value)),
                }
                Ok(ExitCode::SUCCESS)
            }
            None => {
                println!("(nil)");
                Ok(ExitCode::from(2))
            }
        },
        Commands::Set {
            key,
            value,
            file,
            compress,
            ttl,
        } => {
            let value = match (value, file) {
                (_, Some(path)) => fs::read(path)?,
                (Some(value), None) => value.into_bytes(),
                (None, None) => Vec::new(),
            };

            let mut options = WriteOptions {
                compress,
                ..WriteOptions::default()
            };
            if let Some(secs) = ttl {
                options = options.expires_in(Duration::from_secs(secs));
            }

            if cache.write(&key, &value, &options)? {
                println!("OK");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("NOT STORED");
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Del { key } => {
            println!("{}", if cache.delete(&key)? { "OK" } else { "(nil)" });
            Ok(ExitCode::SUCCESS)
        }
        Commands::DelAll { key } => {
            println!("{}", if cache.delete_all(&key)? { "OK" } else { "(nil)" });
            Ok(ExitCode::SUCCESS)
        }
        Commands::Info { key } => {
            match cache.inspect(&key)? {
                Some(info) => {
                    let mode = match info.mode {
                        PageMode::Raw => "raw",
                        PageMode::Paged => "paged",
                    };
                    println!(
                        "mode={} pages={} payload_bytes={}",
                        mode, info.page_count, info.payload_len
                    );
                }
                None => println!("(nil)"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ping => {
            println!("{}", if cache.store().ping()? { "PONG" } else { "no answer" });
            Ok(ExitCode::SUCCESS)
        }
    }
}
