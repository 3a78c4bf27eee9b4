//! Error types for LruKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for LruKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    #[error("Entry too large: costs {cost} bytes, budget is {budget} bytes")]
    TooLarge { cost: usize, budget: usize },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Worker pool saturated, connection rejected")]
    PoolSaturated,

    #[error("Worker pool is shut down")]
    PoolClosed,

    // -------------------------------------------------------------------------
    // Client Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Server answered ERROR")]
    RequestFailed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// True if the error only means the peer went away
    pub fn is_disconnect(&self) -> bool {
        match self {
            KvError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }

    /// True if the error is a socket read/write timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            // Unix reports WouldBlock, Windows reports TimedOut
            KvError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

impl From<bincode::Error> for KvError {
    fn from(e: bincode::Error) -> Self {
        KvError::Serialization(e.to_string())
    }
}
