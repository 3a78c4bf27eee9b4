//! Connection Handler
//!
//! Handles individual client connections.
//!
//! ## State machine
//! ```text
//!   AwaitingRequest ──decode ok──▶ Dispatching ──write ok──▶ AwaitingRequest
//!         │                             │
//!    decode failure                write failure
//!         ▼                             ▼
//!       Closed ◀────────────────────────┘
//! ```
//! A decode failure (malformed frame, EOF, timeout) gets a best-effort
//! `ERROR` response before closing. A write failure closes immediately; the
//! store operation that produced the response is not undone.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::protocol::{read_request, write_response, Item, Request, Response};
use crate::store::Store;

/// Connection lifecycle states
#[derive(Debug)]
enum State {
    AwaitingRequest,
    Dispatching(Request),
    Closed(Option<KvError>),
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared keyspace
    store: Arc<Store>,

    /// Peer address for logging
    peer_addr: String,

    /// Requests served so far
    served: u64,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, store: Arc<Store>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            store,
            peer_addr,
            served: 0,
        })
    }

    /// Configure connection timeouts (`None` blocks indefinitely)
    pub fn set_timeouts(&mut self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(read)?;
        self.writer.get_ref().set_write_timeout(write)?;
        Ok(())
    }

    /// Serve requests until the connection closes (blocking)
    ///
    /// Returns `Ok` when the peer simply went away, or the error that
    /// ended the connection otherwise.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let mut state = State::AwaitingRequest;
        loop {
            state = match state {
                State::AwaitingRequest => self.await_request(),
                State::Dispatching(request) => self.dispatch_and_reply(request),
                State::Closed(reason) => {
                    tracing::debug!(
                        "Connection from {} closed after {} requests",
                        self.peer_addr,
                        self.served
                    );
                    return match reason {
                        None => Ok(()),
                        Some(e) => Err(e),
                    };
                }
            };
        }
    }

    fn await_request(&mut self) -> State {
        let error = match read_request(&mut self.reader) {
            Ok(request) => {
                tracing::trace!("Received request from {}: {:?}", self.peer_addr, request);
                return State::Dispatching(request);
            }
            Err(e) => e,
        };

        if error.is_disconnect() {
            tracing::debug!("Client {} disconnected", self.peer_addr);
        } else if error.is_timeout() {
            tracing::debug!("Read timeout for client {}", self.peer_addr);
        } else {
            tracing::warn!("Error reading from {}: {}", self.peer_addr, error);
        }

        // Best effort: the socket may already be unwritable
        if let Err(e) = self.send_response(&Response::error()) {
            tracing::trace!("Could not send ERROR to {}: {}", self.peer_addr, e);
        }

        if error.is_disconnect() || error.is_timeout() {
            State::Closed(None)
        } else {
            State::Closed(Some(error))
        }
    }

    fn dispatch_and_reply(&mut self, request: Request) -> State {
        let response = dispatch(&self.store, request);
        self.served += 1;

        match self.send_response(&response) {
            Ok(()) => State::AwaitingRequest,
            Err(e) if e.is_disconnect() => {
                tracing::debug!(
                    "Client {} disconnected before response could be sent: {}",
                    self.peer_addr,
                    e
                );
                State::Closed(None)
            }
            Err(e) => {
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                State::Closed(Some(e))
            }
        }
    }

    /// Send a response to the client
    fn send_response(&mut self, response: &Response) -> Result<()> {
        write_response(&mut self.writer, response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Execute one request against the store and build its response
///
/// Missing keys are not errors from the client's point of view: GET answers
/// OK with an empty value and DELETE answers OK regardless.
pub fn dispatch(store: &Store, request: Request) -> Response {
    match request {
        Request::Get { key } => {
            let value = match store.get(&key) {
                Ok(value) => value,
                Err(KvError::NotFound) => String::new(),
                Err(e) => {
                    tracing::warn!("GET {} failed: {}", key, e);
                    return Response::error();
                }
            };
            Response::ok_with(vec![Item::new(key, value)])
        }
        Request::Set { key, value } => match store.set(key, value) {
            Ok(()) => Response::ok(),
            Err(e) => {
                tracing::warn!("SET rejected: {}", e);
                Response::error()
            }
        },
        Request::Delete { key } => match store.delete(&key) {
            Ok(()) => Response::ok(),
            Err(KvError::NotFound) => {
                tracing::debug!("DELETE of absent key {}", key);
                Response::ok()
            }
            Err(e) => {
                tracing::warn!("DELETE {} failed: {}", key, e);
                Response::error()
            }
        },
        Request::Stream => {
            let items = store.enumerate().into_iter().map(Item::from).collect();
            Response::ok_with(items)
        }
    }
}
