//! Store engine
//!
//! Coordinates the hash index, the recency list and the running cost total.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::config::{Config, UNBOUNDED_MEMORY};
use crate::error::{KvError, Result};

use super::cost::{ByteLengthCost, CostModel};
use super::lru::RecencyList;
use super::{Entry, StoreStats};

/// The shared in-memory keyspace
///
/// ## Concurrency Model: one lock, one consistency unit
///
/// The index, the recency list and the accounted total live together in
/// `Inner` behind a single mutex. Every public operation takes the lock
/// once, so a `set` together with its promotion and eviction sweep is a
/// single atomic step, and `enumerate` always sees both structures agree.
///
/// `get` mutates (it promotes), so there is no read-only fast path.
pub struct Store {
    inner: Mutex<Inner>,

    /// Accounted-size function used for every entry
    cost_model: Box<dyn CostModel>,

    /// Ceiling for the accounted total, in bytes
    budget: usize,
}

struct Inner {
    index: HashMap<String, usize>,
    recency: RecencyList,
    used: usize,
    evictions: u64,
}

impl Inner {
    /// Drop least-recently-used entries until the total fits the budget
    fn evict_to(&mut self, budget: usize) -> usize {
        let mut evicted = 0;
        while self.used > budget {
            let Some(node) = self.recency.pop_front() else {
                break;
            };
            self.index.remove(&node.key);
            self.used -= node.cost;
            self.evictions += 1;
            evicted += 1;
            tracing::debug!(
                key = %node.key,
                cost = node.cost,
                used = self.used,
                budget,
                "Evicted least-recently-used entry"
            );
        }
        evicted
    }
}

impl Store {
    /// Create a store with the default byte-length cost model and no overhead
    ///
    /// A budget of 0 means unbounded.
    pub fn new(budget: usize) -> Self {
        Self::with_cost_model(budget, ByteLengthCost::default())
    }

    /// Create a store with a custom cost model
    pub fn with_cost_model(budget: usize, cost_model: impl CostModel + 'static) -> Self {
        let budget = if budget == 0 { UNBOUNDED_MEMORY } else { budget };
        Self {
            inner: Mutex::new(Inner {
                index: HashMap::new(),
                recency: RecencyList::new(),
                used: 0,
                evictions: 0,
            }),
            cost_model: Box::new(cost_model),
            budget,
        }
    }

    /// Create a store sized from server configuration
    pub fn from_config(config: &Config) -> Self {
        Self::with_cost_model(
            config.memory_budget(),
            ByteLengthCost::new(config.entry_overhead),
        )
    }

    /// Insert or overwrite a key (last write wins), then evict
    ///
    /// The key becomes the most-recently-used entry. An entry that alone
    /// costs more than the whole budget is rejected with `TooLarge` and the
    /// store is left untouched, including any previous value of the key.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();

        let cost = self.cost_model.entry_cost(&key, &value);
        if cost > self.budget {
            return Err(KvError::TooLarge {
                cost,
                budget: self.budget,
            });
        }

        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        match inner.index.get(&key).copied() {
            Some(idx) => {
                if let Some(node) = inner.recency.get_mut(idx) {
                    inner.used = inner.used - node.cost + cost;
                    node.value = value;
                    node.cost = cost;
                }
                inner.recency.move_to_back(idx);
            }
            None => {
                let idx = inner.recency.push_back(key.clone(), value, cost);
                inner.index.insert(key, idx);
                inner.used = inner.used.saturating_add(cost);
            }
        }

        // The entry just written sits at the back and fits on its own,
        // so the sweep stops before reaching it.
        inner.evict_to(self.budget);
        Ok(())
    }

    /// Fetch a value and promote the key to most-recently-used
    pub fn get(&self, key: &str) -> Result<String> {
        let mut inner = self.inner.lock();
        let idx = *inner.index.get(key).ok_or(KvError::NotFound)?;
        inner.recency.move_to_back(idx);
        inner
            .recency
            .get(idx)
            .map(|node| node.value.clone())
            .ok_or(KvError::NotFound)
    }

    /// Remove a key from the index and the recency list
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let idx = inner.index.remove(key).ok_or(KvError::NotFound)?;
        if let Some(node) = inner.recency.remove(idx) {
            inner.used -= node.cost;
        }
        Ok(())
    }

    /// Snapshot of all entries, most-recently-used first
    ///
    /// Empty when the store holds nothing; never an error.
    pub fn enumerate(&self) -> Vec<Entry> {
        let inner = self.inner.lock();
        inner
            .recency
            .iter_mru()
            .map(|node| Entry::new(node.key.clone(), node.value.clone()))
            .collect()
    }

    /// Check for a key without touching its recency
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().recency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().recency.is_empty()
    }

    /// Accounted bytes currently in use
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().used
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();
        StoreStats {
            entries: inner.recency.len(),
            used_bytes: inner.used,
            budget: self.budget,
            evictions: inner.evictions,
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(0)
    }
}
