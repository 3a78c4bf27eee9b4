//! Response definitions
//!
//! Represents responses to clients.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::Entry;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ok,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => f.write_str("OK"),
            Status::Error => f.write_str("ERROR"),
        }
    }
}

/// A key/value pair carried in a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    pub value: Option<String>,
}

impl Item {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Value as a string slice, empty when absent
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl From<Entry> for Item {
    fn from(entry: Entry) -> Self {
        Self {
            key: entry.key,
            value: Some(entry.value),
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (one item for GET, all entries for STREAM)
    pub items: Option<Vec<Item>>,
}

impl Response {
    /// Create an OK response without items
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            items: None,
        }
    }

    /// Create an OK response; an empty list is sent as absent
    pub fn ok_with(items: Vec<Item>) -> Self {
        Self {
            status: Status::Ok,
            items: (!items.is_empty()).then_some(items),
        }
    }

    /// Create an ERROR response
    pub fn error() -> Self {
        Self {
            status: Status::Error,
            items: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Items as a slice, empty when absent
    pub fn items(&self) -> &[Item] {
        self.items.as_deref().unwrap_or(&[])
    }
}
