//! Store Module
//!
//! The in-memory keyspace with LRU eviction under a memory budget.
//!
//! ## Responsibilities
//! - Key/value table plus recency ordering, kept consistent under one lock
//! - Promotion on every successful get/set
//! - Eviction of least-recently-used entries once the accounted size
//!   exceeds the budget
//!
//! ## Data Structure Choice
//! A `HashMap<String, usize>` index into a slab-backed doubly-linked list.
//! Lookup, promotion, unlink and eviction are all O(1), and the whole thing
//! sits behind a single `parking_lot::Mutex` so a mutation, its recency
//! update and the eviction sweep form one atomic step.

mod cost;
mod engine;
mod lru;

pub use cost::{ByteLengthCost, CostModel};
pub use engine::Store;

/// A key/value pair held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Point-in-time counters for a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of live entries
    pub entries: usize,

    /// Accounted bytes currently in use
    pub used_bytes: usize,

    /// Configured budget in accounted bytes
    pub budget: usize,

    /// Entries removed by eviction since the store was created
    pub evictions: u64,
}
