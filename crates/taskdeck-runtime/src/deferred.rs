#![forbid(unsafe_code)]

//! Keyed one-shot deferred actions.
//!
//! A [`DeferredQueue`] holds actions due at a future instant, each tagged
//! with a key (a drag session, a toast id). Chained timers become successive
//! entries; cancelling a key drops every pending entry for it.
//!
//! # Invariants
//!
//! 1. [`drain_due`](DeferredQueue::drain_due) returns entries in due order,
//!    ties broken by scheduling order.
//! 2. A drained or cancelled entry never fires again.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use web_time::Instant;

struct Entry<K, A> {
    due: Instant,
    seq: u64,
    key: K,
    action: A,
}

impl<K, A> PartialEq for Entry<K, A> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<K, A> Eq for Entry<K, A> {}

impl<K, A> PartialOrd for Entry<K, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, A> Ord for Entry<K, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// Pending actions ordered by due time.
pub struct DeferredQueue<K, A> {
    heap: BinaryHeap<Reverse<Entry<K, A>>>,
    next_seq: u64,
}

impl<K: PartialEq, A> DeferredQueue<K, A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `action` for `key` at `due`.
    pub fn schedule(&mut self, key: K, due: Instant, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            due,
            seq,
            key,
            action,
        }));
    }

    /// Drop every pending entry for `key`. Returns how many were dropped.
    pub fn cancel_key(&mut self, key: &K) -> usize {
        let before = self.heap.len();
        let kept: Vec<_> = self.heap.drain().filter(|e| e.0.key != *key).collect();
        self.heap = kept.into_iter().collect();
        before - self.heap.len()
    }

    pub fn cancel_all(&mut self) {
        self.heap.clear();
    }

    /// Remove and return every entry due at or before `now`.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(K, A)> {
        let mut out = Vec::new();
        while self.heap.peek().is_some_and(|e| e.0.due <= now) {
            if let Some(Reverse(e)) = self.heap.pop() {
                out.push((e.key, e.action));
            }
        }
        out
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.heap.iter().any(|e| e.0.key == *key)
    }

    /// Earliest pending due time.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.heap.peek().map(|e| e.0.due)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<K: PartialEq, A> Default for DeferredQueue<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, A> std::fmt::Debug for DeferredQueue<K, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.heap.len())
            .finish()
    }
}
