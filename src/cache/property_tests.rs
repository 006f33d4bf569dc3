//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store and key invariants over random inputs.

use proptest::prelude::*;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use crate::cache::{CacheKey, CacheStore};

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "/api/[a-z]{1,8}/[0-9]{1,3}"
}

fn params_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,6}", "[a-zA-Z0-9]{0,8}", 0..6)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: i64 },
    Get { key: String },
    Clear { key: String },
    Prune,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<i64>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Clear { key }),
        1 => Just(CacheOp::Prune),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations the store never holds more than its capacity.
    #[test]
    fn prop_capacity_invariant(
        capacity in 1usize..20,
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let mut store = CacheStore::new(capacity, TEST_DEFAULT_TTL);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, json!(value), None),
                CacheOp::Get { key } => { store.get(&key); }
                CacheOp::Clear { key } => store.clear(&key),
                CacheOp::Prune => { store.prune(); }
            }
            prop_assert!(store.len() <= capacity, "len {} exceeds capacity {}", store.len(), capacity);
            prop_assert_eq!(store.stats().total_entries, store.len());
        }
    }

    // Inserting capacity + 1 distinct keys evicts the first one and only that one.
    #[test]
    fn prop_fifo_eviction_order(keys in prop::collection::hash_set(key_strategy(), 2..30)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let capacity = keys.len() - 1;
        let mut store = CacheStore::new(capacity, TEST_DEFAULT_TTL);

        for (i, key) in keys.iter().enumerate() {
            store.set(key.as_str(), json!(i), None);
        }

        prop_assert!(!store.contains_key(&keys[0]), "first key should be evicted");
        for key in &keys[1..] {
            prop_assert!(store.contains_key(key), "later key {} was evicted", key);
        }
        prop_assert_eq!(store.stats().evictions, 1);
    }

    // Overwriting a key returns the latest payload and keeps a single entry.
    #[test]
    fn prop_overwrite_semantics(key in key_strategy(), v1 in any::<i64>(), v2 in any::<i64>()) {
        let mut store = CacheStore::new(10, TEST_DEFAULT_TTL);

        store.set(key.as_str(), json!(v1), None);
        store.set(key.as_str(), json!(v2), None);

        prop_assert_eq!(store.get(&key), Some(json!(v2)));
        prop_assert_eq!(store.len(), 1);
    }

    // Key derivation ignores the order in which parameters are supplied.
    #[test]
    fn prop_key_order_independent(url in key_strategy(), params in params_strategy()) {
        let forward: Vec<(String, String)> = params.clone().into_iter().collect();
        let mut backward = forward.clone();
        backward.reverse();

        prop_assert_eq!(
            CacheKey::derive(&url, forward),
            CacheKey::derive(&url, backward)
        );
    }

    // Changing any parameter value changes the key.
    #[test]
    fn prop_key_sensitive_to_values(
        url in key_strategy(),
        params in params_strategy().prop_filter("need a param", |p| !p.is_empty())
    ) {
        let original = CacheKey::derive(&url, params.clone());

        let mut changed = params;
        if let Some(value) = changed.values_mut().next() {
            value.push('!');
        }

        prop_assert_ne!(original, CacheKey::derive(&url, changed));
    }

    // Stored payloads are read back unchanged and never touch other keys.
    #[test]
    fn prop_distinct_keys_isolated(keys in prop::collection::hash_set(key_strategy(), 1..20)) {
        let mut store = CacheStore::new(50, TEST_DEFAULT_TTL);
        let keys: HashSet<String> = keys;

        for key in &keys {
            store.set(key.as_str(), json!({ "url": key }), None);
        }
        for key in &keys {
            prop_assert_eq!(store.get(key), Some(json!({ "url": key })));
        }
    }
}
