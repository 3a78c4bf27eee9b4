//! Tests for Store
//!
//! These tests verify:
//! - Basic get/set/delete operations
//! - Recency ordering on enumerate
//! - Eviction under budget pressure
//! - Oversized entries
//! - Concurrent access patterns

use std::sync::Arc;
use std::thread;

use lrukv::config::Config;
use lrukv::store::{ByteLengthCost, CostModel, Entry, Store};
use lrukv::KvError;

const KEY1: &str = "foo";
const VALUE1: &str = "bar";
const KEY2: &str = "foo1";
const VALUE2: &str = "bar1";
const KEY3: &str = "foo2";
const VALUE3: &str = "bar2";

fn keys(store: &Store) -> Vec<String> {
    store.enumerate().into_iter().map(|e| e.key).collect()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_set_get_round_trip() {
    let store = Store::new(1000);

    store.set(KEY1, VALUE1).unwrap();

    assert_eq!(store.get(KEY1).unwrap(), VALUE1);
}

#[test]
fn test_last_write_wins() {
    let store = Store::new(1000);

    store.set(KEY1, VALUE1).unwrap();
    store.set(KEY1, VALUE2).unwrap();

    assert_eq!(store.get(KEY1).unwrap(), VALUE2);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_get_nonexistent_key() {
    let store = Store::new(1000);

    assert!(matches!(store.get(KEY1), Err(KvError::NotFound)));
}

#[test]
fn test_delete_then_get_not_found() {
    let store = Store::new(1000);

    store.set(KEY1, VALUE1).unwrap();
    store.delete(KEY1).unwrap();

    assert!(matches!(store.get(KEY1), Err(KvError::NotFound)));
    assert!(store.is_empty());
}

#[test]
fn test_delete_nonexistent_key() {
    let store = Store::new(1000);

    assert!(matches!(store.delete(KEY1), Err(KvError::NotFound)));
}

#[test]
fn test_empty_and_unicode_values() {
    let store = Store::new(1000);

    store.set("empty", "").unwrap();
    store.set("ключ", "значение").unwrap();

    assert_eq!(store.get("empty").unwrap(), "");
    assert_eq!(store.get("ключ").unwrap(), "значение");
}

// =============================================================================
// Recency Tests
// =============================================================================

#[test]
fn test_enumerate_empty_store() {
    let store = Store::new(1000);

    assert!(store.enumerate().is_empty());
}

#[test]
fn test_enumerate_mru_first() {
    let store = Store::new(1000);

    store.set(KEY1, VALUE1).unwrap();
    store.set(KEY2, VALUE2).unwrap();

    assert_eq!(
        store.enumerate(),
        vec![Entry::new(KEY2, VALUE2), Entry::new(KEY1, VALUE1)]
    );
}

#[test]
fn test_reset_promotes_key() {
    let store = Store::new(1000);

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("a", "3").unwrap();

    assert_eq!(keys(&store), vec!["a", "b"]);
}

#[test]
fn test_get_promotes_key() {
    let store = Store::new(1000);

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("c", "3").unwrap();
    store.get("a").unwrap();

    assert_eq!(keys(&store), vec!["a", "c", "b"]);
}

#[test]
fn test_contains_does_not_promote() {
    let store = Store::new(1000);

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert!(store.contains("a"));

    assert_eq!(keys(&store), vec!["b", "a"]);
}

// =============================================================================
// Eviction Tests
// =============================================================================

#[test]
fn test_eviction_drops_least_recently_used() {
    // foo/bar costs 6, foo1/bar1 costs 8; together they exceed 10
    let store = Store::new(10);

    store.set(KEY1, VALUE1).unwrap();
    store.set(KEY2, VALUE2).unwrap();

    assert!(matches!(store.get(KEY1), Err(KvError::NotFound)));
    assert_eq!(store.get(KEY2).unwrap(), VALUE2);
    assert!(store.used_bytes() <= 10);
}

#[test]
fn test_eviction_exact_fit_budget() {
    let store = Store::new(6);

    store.set(KEY1, VALUE1).unwrap();
    assert_eq!(store.used_bytes(), 6);
    assert_eq!(store.get(KEY1).unwrap(), VALUE1);

    store.set("baz", "qux").unwrap();

    assert!(matches!(store.get(KEY1), Err(KvError::NotFound)));
    assert_eq!(store.get("baz").unwrap(), "qux");
}

#[test]
fn test_eviction_respects_get_promotion() {
    // Each entry costs 8 with these keys; budget holds two
    let store = Store::new(16);

    store.set(KEY2, VALUE2).unwrap();
    store.set(KEY3, VALUE3).unwrap();
    store.get(KEY2).unwrap();
    store.set("foo3", "bar3").unwrap();

    assert_eq!(store.get(KEY2).unwrap(), VALUE2);
    assert_eq!(store.get("foo3").unwrap(), "bar3");
    assert!(matches!(store.get(KEY3), Err(KvError::NotFound)));
}

#[test]
fn test_eviction_removes_only_what_is_needed() {
    let store = Store::new(20);

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("c", "3").unwrap();
    // 6 bytes in use; this one costs 16
    store.set("big", "0123456789abc").unwrap();

    assert_eq!(keys(&store), vec!["big", "c", "b"]);
    assert_eq!(store.used_bytes(), 20);
    assert_eq!(store.stats().evictions, 1);
}

#[test]
fn test_growing_overwrite_evicts_others() {
    let store = Store::new(12);

    store.set("a", "11").unwrap();
    store.set("b", "22").unwrap();
    store.set("a", "1234567890").unwrap();

    assert_eq!(keys(&store), vec!["a"]);
    assert_eq!(store.used_bytes(), 11);
}

#[test]
fn test_overhead_counts_toward_budget() {
    let store = Store::with_cost_model(40, ByteLengthCost::new(16));

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.set("c", "3").unwrap();

    // 18 per entry, two fit in 40
    assert_eq!(keys(&store), vec!["c", "b"]);
    assert_eq!(store.used_bytes(), 36);
}

#[test]
fn test_from_config_uses_budget_and_overhead() {
    let config = Config::builder()
        .max_keyspace_memory(20)
        .entry_overhead(4)
        .build();
    let store = Store::from_config(&config);

    store.set(KEY1, VALUE1).unwrap();
    assert_eq!(store.used_bytes(), 10);
    assert_eq!(store.budget(), 20);
}

#[test]
fn test_zero_budget_is_unbounded() {
    let store = Store::new(0);

    for i in 0..1000 {
        store.set(format!("key{}", i), "x".repeat(100)).unwrap();
    }

    assert_eq!(store.len(), 1000);
    assert_eq!(store.stats().evictions, 0);
}

// =============================================================================
// Oversized Entry Tests
// =============================================================================

#[test]
fn test_oversized_entry_rejected() {
    let store = Store::new(5);

    let result = store.set(KEY1, VALUE1);

    assert!(matches!(
        result,
        Err(KvError::TooLarge { cost: 6, budget: 5 })
    ));
    assert!(store.is_empty());
}

#[test]
fn test_oversized_overwrite_keeps_old_value() {
    let store = Store::new(8);

    store.set("k", "v").unwrap();
    store.set("other", "x").unwrap();

    assert!(store.set("k", "way too long").is_err());

    assert_eq!(store.get("k").unwrap(), "v");
    assert_eq!(store.get("other").unwrap(), "x");
}

// =============================================================================
// Custom Cost Model Tests
// =============================================================================

struct FlatCost;

impl CostModel for FlatCost {
    fn entry_cost(&self, _key: &str, _value: &str) -> usize {
        1
    }
}

#[test]
fn test_custom_cost_model_caps_entry_count() {
    let store = Store::with_cost_model(3, FlatCost);

    for i in 0..10 {
        store.set(format!("k{}", i), "whatever").unwrap();
    }

    assert_eq!(keys(&store), vec!["k9", "k8", "k7"]);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_sets_distinct_keys() {
    let store = Arc::new(Store::new(0));
    let threads = 8;
    let per_thread = 200;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..per_thread {
                    store.set(format!("t{}-k{}", t, i), format!("v{}", i)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), threads * per_thread);
    for t in 0..threads {
        for i in 0..per_thread {
            assert_eq!(store.get(&format!("t{}-k{}", t, i)).unwrap(), format!("v{}", i));
        }
    }
}

#[test]
fn test_concurrent_mixed_ops_keep_budget() {
    let store = Arc::new(Store::new(200));

    let handles: Vec<_> = (0..6)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("k{}", (t * 7 + i) % 40);
                    match i % 4 {
                        0 | 1 => store.set(key, "value").unwrap(),
                        2 => {
                            let _ = store.get(&key);
                        }
                        _ => {
                            let _ = store.delete(&key);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = store.enumerate();
    let stats = store.stats();
    assert_eq!(entries.len(), stats.entries);
    assert!(stats.used_bytes <= 200);

    let accounted: usize = entries
        .iter()
        .map(|e| ByteLengthCost::default().entry_cost(&e.key, &e.value))
        .sum();
    assert_eq!(accounted, stats.used_bytes);
}
