//! Configuration for LruKV
//!
//! Centralized configuration with sensible defaults. The server reads it
//! once at startup from a JSON file; every field is optional.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{KvError, Result};

/// Default TCP port for server and client
pub const DEFAULT_PORT: u16 = 14567;

/// Budget used when `max_keyspace_memory` is 0: no bound at all
pub const UNBOUNDED_MEMORY: usize = usize::MAX;

const LOG_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Main configuration for an LruKV server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Host or IP the listener binds to
    pub listen_host: String,

    /// TCP port the listener binds to (0 picks an ephemeral port)
    pub server_port: u16,

    /// Number of workers, i.e. connections served at the same time
    pub max_concurrent_client_connections: usize,

    /// Accepted connections allowed to wait for a free worker
    pub max_pending_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Memory budget of the keyspace in accounted bytes (0 = unbounded)
    pub max_keyspace_memory: usize,

    /// Fixed cost charged per entry on top of key and value bytes
    pub entry_overhead: usize,

    // -------------------------------------------------------------------------
    // Logging
    // -------------------------------------------------------------------------
    /// One of TRACE, DEBUG, INFO, WARN, ERROR
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: "127.0.0.1".to_string(),
            server_port: DEFAULT_PORT,
            max_concurrent_client_connections: 10,
            max_pending_connections: 64,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
            max_keyspace_memory: 1000,
            entry_overhead: 0,
            log_level: "INFO".to_string(),
        }
    }
}

/// On-disk shape of the configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    listen_host: Option<String>,
    server_port: Option<u16>,
    max_concurrent_client_connections: Option<usize>,
    max_pending_connections: Option<usize>,
    read_timeout_ms: Option<u64>,
    write_timeout_ms: Option<u64>,
    max_keyspace_memory: Option<usize>,
    entry_overhead: Option<usize>,
    log_level: Option<String>,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            KvError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a config from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(text)
            .map_err(|e| KvError::Config(format!("invalid config: {}", e)))?;

        let defaults = Config::default();
        let config = Config {
            listen_host: file.listen_host.unwrap_or(defaults.listen_host),
            server_port: file.server_port.unwrap_or(defaults.server_port),
            max_concurrent_client_connections: file
                .max_concurrent_client_connections
                .unwrap_or(defaults.max_concurrent_client_connections),
            max_pending_connections: file
                .max_pending_connections
                .unwrap_or(defaults.max_pending_connections),
            read_timeout_ms: file.read_timeout_ms.unwrap_or(defaults.read_timeout_ms),
            write_timeout_ms: file.write_timeout_ms.unwrap_or(defaults.write_timeout_ms),
            max_keyspace_memory: file
                .max_keyspace_memory
                .unwrap_or(defaults.max_keyspace_memory),
            entry_overhead: file.entry_overhead.unwrap_or(defaults.entry_overhead),
            log_level: file.log_level.unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_client_connections == 0 {
            return Err(KvError::Config(
                "max_concurrent_client_connections must be at least 1".to_string(),
            ));
        }
        if self.max_pending_connections == 0 {
            return Err(KvError::Config(
                "max_pending_connections must be at least 1".to_string(),
            ));
        }
        if self.listen_host.trim().is_empty() {
            return Err(KvError::Config("listen_host must not be empty".to_string()));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_uppercase().as_str()) {
            return Err(KvError::Config(format!(
                "unknown log_level '{}', expected one of {:?}",
                self.log_level, LOG_LEVELS
            )));
        }
        Ok(())
    }

    /// Effective store budget in accounted bytes
    pub fn memory_budget(&self) -> usize {
        if self.max_keyspace_memory == 0 {
            UNBOUNDED_MEMORY
        } else {
            self.max_keyspace_memory
        }
    }

    /// Log level as a tracing filter directive
    pub fn log_filter(&self) -> String {
        self.log_level.to_ascii_lowercase()
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the host the listener binds to
    pub fn listen_host(mut self, host: impl Into<String>) -> Self {
        self.config.listen_host = host.into();
        self
    }

    /// Set the TCP port
    pub fn server_port(mut self, port: u16) -> Self {
        self.config.server_port = port;
        self
    }

    /// Set the number of workers
    pub fn max_concurrent_client_connections(mut self, count: usize) -> Self {
        self.config.max_concurrent_client_connections = count;
        self
    }

    /// Set the dispatch queue capacity
    pub fn max_pending_connections(mut self, count: usize) -> Self {
        self.config.max_pending_connections = count;
        self
    }

    /// Set the keyspace memory budget (in accounted bytes)
    pub fn max_keyspace_memory(mut self, bytes: usize) -> Self {
        self.config.max_keyspace_memory = bytes;
        self
    }

    /// Set the fixed per-entry overhead
    pub fn entry_overhead(mut self, bytes: usize) -> Self {
        self.config.entry_overhead = bytes;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
