//! Insertion Order Module
//!
//! Tracks the order in which keys entered the store, for FIFO eviction.

use std::collections::VecDeque;

use crate::cache::CacheKey;

// == Insertion Order ==
/// Keys in the order they were first inserted.
///
/// - Front = earliest inserted
/// - Back = latest inserted
///
/// Re-inserting a key that is still tracked does not move it; reads never
/// touch the order.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<CacheKey>,
}

impl InsertionOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Appends a key unless it is already tracked.
    pub fn record(&mut self, key: &CacheKey) {
        if !self.contains(key) {
            self.order.push_back(key.clone());
        }
    }

    // == Remove ==
    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k.as_str() != key);
    }

    // == Pop Oldest ==
    /// Returns and forgets the earliest inserted key.
    pub fn pop_oldest(&mut self) -> Option<CacheKey> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    pub fn peek_oldest(&self) -> Option<&CacheKey> {
        self.order.front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k.as_str() == key)
    }
}
