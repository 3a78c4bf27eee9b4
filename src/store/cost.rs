//! Accounted-size model
//!
//! Maps an entry to the number of bytes it is charged against the budget.

/// Cost function used by the store's eviction policy
///
/// Implementations must be deterministic: the same key/value pair always
/// costs the same, otherwise the running total drifts.
pub trait CostModel: Send + Sync {
    fn entry_cost(&self, key: &str, value: &str) -> usize;
}

/// Default model: key bytes + value bytes + a fixed per-entry overhead
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteLengthCost {
    overhead: usize,
}

impl ByteLengthCost {
    pub fn new(overhead: usize) -> Self {
        Self { overhead }
    }

    pub fn overhead(&self) -> usize {
        self.overhead
    }
}

impl CostModel for ByteLengthCost {
    fn entry_cost(&self, key: &str, value: &str) -> usize {
        key.len()
            .saturating_add(value.len())
            .saturating_add(self.overhead)
    }
}
