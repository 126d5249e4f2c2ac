//! kdict Server Binary
//!
//! Owns the store for the lifetime of the process and exposes it over TCP.

use std::sync::Arc;

use clap::Parser;
use kdict::network::Server;
use kdict::{Config, Dispatcher, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// kdict Server
#[derive(Parser, Debug)]
#[command(name = "kdict-server")]
#[command(about = "In-memory hashed key-value dictionary")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// log2 of the hash bucket count (8 = 256 buckets)
    #[arg(short, long, default_value = "8")]
    bucket_bits: u32,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Connections allowed to wait for a worker
    #[arg(short = 'p', long, default_value = "64")]
    max_pending: usize,

    /// Idle read timeout per connection in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kdict=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("kdict Server v{}", kdict::VERSION);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .bucket_bits(args.bucket_bits)
        .worker_threads(args.workers)
        .max_pending_connections(args.max_pending)
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    let store = match Store::open(&config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, Dispatcher::new(Arc::clone(&store))) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown.shutdown();
    }) {
        tracing::warn!("Could not install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        store.teardown();
        std::process::exit(1);
    }

    // Workers are joined; nothing is in flight any more
    let released = store.teardown();
    tracing::info!("Server stopped, {} entries released", released);
}
