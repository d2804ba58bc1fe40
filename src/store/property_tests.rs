//! Property-Based Tests for Store Module
//!
//! Uses proptest to check the recency and eviction guarantees of `RecentStore`.

use proptest::prelude::*;
use std::collections::HashSet;

use crate::codec::{integral_value, Value};
use crate::storage::{MemoryStorage, Storage};
use crate::store::{Lookup, RecentStore, Write};

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;
const TEST_MAX_SIZE: usize = 8;
const RECENT_KEY: &str = "__recent";

// == Strategies ==
/// Generates store keys (no delimiter, never the recency key)
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,12}".prop_filter("reserved key", |k| k != RECENT_KEY)
}

/// Generates plain string values
fn string_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _]{0,64}".prop_map(|s| s)
}

/// Generates a sequence of store operations
#[derive(Debug, Clone)]
enum StoreOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), string_value_strategy())
            .prop_map(|(key, value)| StoreOp::Set { key, value }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
        key_strategy().prop_map(|key| StoreOp::Delete { key }),
    ]
}

fn apply(store: &mut RecentStore, op: StoreOp) {
    match op {
        StoreOp::Set { key, value } => {
            let _ = store.set(&key, value);
        }
        StoreOp::Get { key } => {
            let _ = store.get(&key);
        }
        StoreOp::Delete { key } => {
            let _ = store.delete(&key);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The recency list never exceeds max_size, never repeats a key and never
    // names the recency key itself.
    #[test]
    fn prop_recency_window_bounded(
        max_size in 1usize..10,
        ops in prop::collection::vec(store_op_strategy(), 1..60),
    ) {
        let mut store = RecentStore::builder(MemoryStorage::new(TEST_CAPACITY))
            .max_size(max_size)
            .seed(0)
            .build()
            .unwrap();

        for op in ops {
            apply(&mut store, op);

            let recent = store.recent().into_value();
            let unique: HashSet<&String> = recent.iter().collect();
            prop_assert!(recent.len() <= max_size, "Window grew to {}", recent.len());
            prop_assert_eq!(unique.len(), recent.len(), "Duplicate in {:?}", recent);
            prop_assert!(!recent.iter().any(|k| k == RECENT_KEY));
        }
    }

    // The last touched key is always at the front of the list.
    #[test]
    fn prop_last_touched_is_most_recent(
        ops in prop::collection::vec(store_op_strategy(), 1..40),
        key in key_strategy(),
    ) {
        let mut store = RecentStore::builder(MemoryStorage::new(TEST_CAPACITY))
            .max_size(TEST_MAX_SIZE)
            .seed(0)
            .build()
            .unwrap();

        for op in ops {
            apply(&mut store, op);
        }
        store.get(&key);

        let recent = store.recent().into_value();
        prop_assert_eq!(recent.first(), Some(&key));
    }

    // Any plain string written is read back unchanged.
    #[test]
    fn prop_string_roundtrip(key in key_strategy(), value in string_value_strategy()) {
        let mut store = RecentStore::builder(MemoryStorage::new(TEST_CAPACITY))
            .build()
            .unwrap();

        prop_assert_eq!(store.set(&key, value.clone()).unwrap(), Write::Stored);
        prop_assert_eq!(store.get(&key), Lookup::Found(Value::String(value)));
    }

    // Integers come back as integers.
    #[test]
    fn prop_int_roundtrip(key in key_strategy(), n in any::<i64>()) {
        let mut store = RecentStore::builder(MemoryStorage::new(TEST_CAPACITY))
            .build()
            .unwrap();

        store.set(&key, n).unwrap();
        prop_assert_eq!(store.get(&key), Lookup::Found(Value::Int(n)));
    }

    // Floats come back as the same number; integral ones as integers.
    #[test]
    fn prop_float_roundtrip(key in key_strategy(), f in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let mut store = RecentStore::builder(MemoryStorage::new(TEST_CAPACITY))
            .build()
            .unwrap();

        store.set(&key, f).unwrap();
        let expected = match integral_value(f) {
            Some(i) => Value::Int(i),
            None => Value::Float(f),
        };
        prop_assert_eq!(store.get(&key), Lookup::Found(expected));
    }

    // A small provider never holds more entries than it allows, and the
    // window keys that were written stay readable.
    #[test]
    fn prop_capacity_never_exceeded(
        keys in prop::collection::vec(key_strategy(), 1..60),
        seed in any::<u64>(),
    ) {
        let capacity = 12;
        let max_size = 4;
        let mut store = RecentStore::builder(MemoryStorage::new(capacity))
            .max_size(max_size)
            .seed(seed)
            .build()
            .unwrap();

        for key in &keys {
            let write = store.set(key, key.clone()).unwrap();
            prop_assert!(write.is_stored(), "Write of {} dropped: {:?}", key, write);
            prop_assert!(store.storage().len().unwrap() <= capacity);
        }

        for key in store.recent().into_value() {
            prop_assert!(store.has(&key).into_value(), "Recent key {} was evicted", key);
        }
    }

    // Keys the admission predicate rejects are never evicted.
    #[test]
    fn prop_admission_respected(
        keys in prop::collection::vec("[a-z]{1,6}", 1..60),
        seed in any::<u64>(),
    ) {
        let mut store = RecentStore::builder(MemoryStorage::new(10))
            .max_size(2)
            .is_candidate(|key, _recent| !key.starts_with("pin"))
            .seed(seed)
            .build()
            .unwrap();

        store.set("pinned", "stay").unwrap();
        for key in keys.iter().filter(|k| !k.starts_with("pin")) {
            let _ = store.set(key, "filler");
            prop_assert!(store.has("pinned").into_value(), "pinned evicted after {}", key);
        }
    }
}
