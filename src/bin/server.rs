//! LruKV Server Binary
//!
//! Loads the configuration file and starts the TCP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use lrukv::network::Server;
use lrukv::{Config, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// LruKV Server
#[derive(Parser, Debug)]
#[command(name = "lrukv-server")]
#[command(about = "In-memory key-value store with LRU eviction")]
#[command(version)]
struct Args {
    /// Path to the JSON configuration file
    config: PathBuf,
}

fn main() {
    let args = Args::parse();

    // Config errors are fatal and happen before any socket is opened
    let config = match Config::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            init_tracing("info");
            tracing::error!("Failed to load {}: {}", args.config.display(), e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_filter());

    tracing::info!("LruKV Server v{}", lrukv::VERSION);
    tracing::info!(
        "Keyspace budget: {} bytes, per-entry overhead: {} bytes",
        config.memory_budget(),
        config.entry_overhead
    );

    let store = Arc::new(Store::from_config(&config));

    let server = match Server::bind(config, store) {
        Ok(s) => s,
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

/// Initialize tracing/logging; RUST_LOG wins over the given default
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}
