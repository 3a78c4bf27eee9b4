//! LruKV CLI Client
//!
//! Interactive shell for an LruKV server.

use std::io;
use std::time::Duration;

use clap::Parser;
use lrukv::config::DEFAULT_PORT;
use lrukv::{shell, Client};
use tracing_subscriber::{fmt, EnvFilter};

/// LruKV CLI
#[derive(Parser, Debug)]
#[command(name = "lrukv-cli")]
#[command(about = "Interactive shell for the LruKV key-value store")]
struct Args {
    /// Server host or IP address
    server: String,

    /// Server port
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Socket timeout in milliseconds (0 waits forever)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,
}

fn main() {
    // Diagnostics go to stderr so they never interleave with replies
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();
    let timeout = (args.timeout_ms > 0).then(|| Duration::from_millis(args.timeout_ms));

    println!("Connecting to LruKV server at {}:{}", args.server, args.port);

    let mut client = match Client::connect((args.server.as_str(), args.port), timeout) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Could not connect to {}:{}: {}", args.server, args.port, e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    if shell::run(&mut client, stdin.lock(), io::stdout()).is_err() {
        std::process::exit(1);
    }
}
