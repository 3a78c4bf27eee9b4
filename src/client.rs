//! Blocking client
//!
//! Speaks the framed protocol over one TCP connection.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::protocol::{read_response, write_request, Item, Request, Response};

/// Longest key the client will send
pub const MAX_KEY_LEN: usize = 100;

/// A connection to an LruKV server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect, optionally bounding every read and write by `timeout`
    pub fn connect(addr: impl ToSocketAddrs, timeout: Option<Duration>) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Reject keys the server should never see: empty or over `MAX_KEY_LEN` bytes
    pub fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("key is empty".to_string()));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(KvError::InvalidKey(format!(
                "key is {} bytes (max {})",
                key.len(),
                MAX_KEY_LEN
            )));
        }
        Ok(())
    }

    /// Send one request and wait for its response, whatever the status
    pub fn send(&mut self, request: &Request) -> Result<Response> {
        write_request(&mut self.writer, request)?;
        read_response(&mut self.reader)
    }

    /// Value for `key`; a missing key reads back as the empty string
    pub fn get(&mut self, key: &str) -> Result<String> {
        Self::validate_key(key)?;
        let response = self.call(&Request::Get {
            key: key.to_string(),
        })?;
        response
            .items()
            .first()
            .map(|item| item.value_str().to_string())
            .ok_or_else(|| KvError::Protocol("GET response carried no item".to_string()))
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;
        self.call(&Request::Set {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }

    pub fn delete(&mut self, key: &str) -> Result<()> {
        Self::validate_key(key)?;
        self.call(&Request::Delete {
            key: key.to_string(),
        })?;
        Ok(())
    }

    /// Every entry, most-recently-used first
    pub fn stream(&mut self) -> Result<Vec<Item>> {
        let response = self.call(&Request::Stream)?;
        Ok(response.items.unwrap_or_default())
    }

    fn call(&mut self, request: &Request) -> Result<Response> {
        let response = self.send(request)?;
        if response.is_ok() {
            Ok(response)
        } else {
            Err(KvError::RequestFailed)
        }
    }
}
