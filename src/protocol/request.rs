//! Request definitions
//!
//! Represents requests from clients.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestType {
    Get = 0x01,
    Set = 0x02,
    Delete = 0x03,
    Stream = 0x04,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestType::Get => "GET",
            RequestType::Set => "SET",
            RequestType::Delete => "DELETE",
            RequestType::Stream => "STREAM",
        };
        f.write_str(name)
    }
}

/// A decoded request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Get a value by key
    Get { key: String },

    /// Set a key-value pair
    Set { key: String, value: String },

    /// Delete a key
    Delete { key: String },

    /// Every entry, most-recently-used first
    Stream,
}

impl Request {
    /// Get the request type
    pub fn request_type(&self) -> RequestType {
        match self {
            Request::Get { .. } => RequestType::Get,
            Request::Set { .. } => RequestType::Set,
            Request::Delete { .. } => RequestType::Delete,
            Request::Stream => RequestType::Stream,
        }
    }

    /// The key the request addresses, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Request::Get { key } | Request::Set { key, .. } | Request::Delete { key } => {
                Some(key.as_str())
            }
            Request::Stream => None,
        }
    }
}
