//! TCP Server
//!
//! Accepts connections and dispatches them to the worker pool.

use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::network::{Connection, WorkerPool};
use crate::protocol::{write_response, Response};
use crate::store::Store;

/// TCP server for LruKV
///
/// One acceptor (the thread calling `run`) hands each accepted connection
/// to the pool as exactly one job. The job owns the socket for the whole
/// connection lifetime.
pub struct Server {
    config: Config,
    store: Arc<Store>,
    listener: TcpListener,
    pool: WorkerPool,
}

impl Server {
    /// Bind the listener and start the worker pool
    pub fn bind(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind((config.listen_host.as_str(), config.server_port))?;
        let pool = WorkerPool::new(
            config.max_concurrent_client_connections,
            config.max_pending_connections,
        )?;

        tracing::info!(
            "Listening on {} with {} workers",
            listener.local_addr()?,
            pool.size()
        );

        Ok(Self {
            config,
            store,
            listener,
            pool,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Accept connections forever (blocking)
    pub fn run(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.accept(stream),
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            }
        }
        Ok(())
    }

    fn accept(&self, stream: TcpStream) {
        // Kept aside so a rejected client can still be told ERROR
        let mut reply_stream = match stream.try_clone() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to clone accepted stream: {}", e);
                return;
            }
        };

        let mut connection = match Connection::new(stream, Arc::clone(&self.store)) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Failed to set up connection: {}", e);
                return;
            }
        };

        if let Err(e) =
            connection.set_timeouts(self.config.read_timeout(), self.config.write_timeout())
        {
            tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
            return;
        }

        let peer = connection.peer_addr().to_string();
        let job = move || {
            if let Err(e) = connection.handle() {
                tracing::debug!("Connection {} ended with error: {}", connection.peer_addr(), e);
            }
        };

        match self.pool.try_submit(job) {
            Ok(()) => tracing::trace!(
                "Queued connection from {} ({} waiting, {} busy)",
                peer,
                self.pool.queued(),
                self.pool.busy()
            ),
            Err(e) => {
                tracing::warn!("Rejecting connection from {}: {}", peer, e);
                if let Err(e) = write_response(&mut reply_stream, &Response::error()) {
                    tracing::debug!("Could not send ERROR to {}: {}", peer, e);
                }
                let _ = reply_stream.shutdown(Shutdown::Both);
            }
        }
    }
}
