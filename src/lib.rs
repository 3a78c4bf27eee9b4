//! # LruKV
//!
//! An in-memory key-value store with:
//! - A fixed memory budget enforced by least-recently-used eviction
//! - An explicit, deterministic accounted-size model
//! - A single-lock store: mutation, promotion and eviction are one step
//! - A fixed worker pool serving framed TCP connections
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Listener (acceptor)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one job per connection
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Worker Pool (bounded queue)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │     Connection Handler: read ─▶ dispatch ─▶ write (loop)     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │     Store     │
//!               │ index + LRU   │
//!               │   (Mutex)     │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod network;
pub mod client;
pub mod shell;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use store::Store;
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LruKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
