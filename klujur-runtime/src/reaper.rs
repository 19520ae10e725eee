// klujur-runtime - Weak cache sweeping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Hygiene sweep for caches that map keys to weak references.
//!
//! Interning tables hold weak references so that unused entries can be
//! dropped. A dropped referent leaves a dead entry behind; its owner posts
//! a notice to a [`ReferenceQueue`], and the next caller of
//! [`clear_cache`] drains the queue and removes dead entries.
//!
//! Removal is conditional on the exact reference instance that was scanned,
//! so an entry refreshed with a live reference between the scan and the
//! removal is left alone. The sweep is safe to run while other threads
//! insert into and read from the same map.

use std::hash::Hash;
use std::sync::{Arc, Weak};

use crossbeam::queue::SegQueue;
use dashmap::DashMap;
use tracing::debug;

/// Queue of clearance notices posted when cached referents are dropped.
#[derive(Debug, Default)]
pub struct ReferenceQueue {
    notices: SegQueue<usize>,
}

impl ReferenceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notice. The payload identifies the cleared allocation and is
    /// only used for diagnostics.
    pub fn enqueue(&self, addr: usize) {
        self.notices.push(addr);
    }

    /// Take one pending notice, if any.
    pub fn poll(&self) -> Option<usize> {
        self.notices.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}

/// Posts a notice to its queue when dropped.
///
/// Embed one in a cached referent so that dropping the referent reports it.
#[derive(Debug)]
pub struct ClearNotice {
    queue: Arc<ReferenceQueue>,
    addr: usize,
}

impl ClearNotice {
    pub fn new(queue: Arc<ReferenceQueue>, addr: usize) -> Self {
        ClearNotice { queue, addr }
    }
}

impl Drop for ClearNotice {
    fn drop(&mut self) {
        self.queue.enqueue(self.addr);
    }
}

/// A reference stored in a cache.
pub trait CachedRef {
    /// Whether the referent has been dropped.
    fn is_cleared(&self) -> bool;

    /// Whether both handles are the same reference instance.
    fn same_ref(&self, other: &Self) -> bool;
}

impl<T> CachedRef for Weak<T> {
    fn is_cleared(&self) -> bool {
        self.strong_count() == 0
    }

    fn same_ref(&self, other: &Self) -> bool {
        Weak::ptr_eq(self, other)
    }
}

/// Remove dead entries from `cache` if `queue` has pending notices.
///
/// Returns the number of entries removed.
pub fn clear_cache<K, R>(queue: &ReferenceQueue, cache: &DashMap<K, R>) -> usize
where
    K: Eq + Hash + Clone,
    R: CachedRef + Clone,
{
    if queue.poll().is_none() {
        return 0;
    }
    while queue.poll().is_some() {}

    let cleared = collect_cleared(cache);
    let removed = remove_cleared(cache, cleared);
    if removed > 0 {
        debug!(removed, remaining = cache.len(), "swept cleared cache entries");
    }
    removed
}

/// Snapshot the entries whose references are cleared.
///
/// Shard locks must not be held while removing, so the scan and the
/// removal are separate passes.
fn collect_cleared<K, R>(cache: &DashMap<K, R>) -> Vec<(K, R)>
where
    K: Eq + Hash + Clone,
    R: CachedRef + Clone,
{
    cache
        .iter()
        .filter(|entry| entry.value().is_cleared())
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect()
}

/// Remove each scanned entry only if the map still holds that exact
/// reference instance.
fn remove_cleared<K, R>(cache: &DashMap<K, R>, cleared: Vec<(K, R)>) -> usize
where
    K: Eq + Hash + Clone,
    R: CachedRef + Clone,
{
    cleared
        .into_iter()
        .filter(|(key, stale)| cache.remove_if(key, |_, current| current.same_ref(stale)).is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_notice_no_sweep() {
        let queue = ReferenceQueue::new();
        let cache: DashMap<&str, Weak<i32>> = DashMap::new();
        let dead = Arc::new(1);
        cache.insert("a", Arc::downgrade(&dead));
        drop(dead);

        assert_eq!(clear_cache(&queue, &cache), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_sweep_removes_cleared_and_drains_queue() {
        let queue = ReferenceQueue::new();
        let cache: DashMap<&str, Weak<i32>> = DashMap::new();
        let live = Arc::new(1);
        let dead = Arc::new(2);
        cache.insert("live", Arc::downgrade(&live));
        cache.insert("dead", Arc::downgrade(&dead));
        drop(dead);
        queue.enqueue(0);
        queue.enqueue(0);

        assert_eq!(clear_cache(&queue, &cache), 1);
        assert!(cache.contains_key("live"));
        assert!(!cache.contains_key("dead"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_refreshed_entry_survives_removal() {
        let cache: DashMap<&str, Weak<i32>> = DashMap::new();
        let dead = Arc::new(1);
        cache.insert("k", Arc::downgrade(&dead));
        drop(dead);

        let cleared = collect_cleared(&cache);
        assert_eq!(cleared.len(), 1);

        // Another thread re-interns the key between scan and removal
        let fresh = Arc::new(2);
        cache.insert("k", Arc::downgrade(&fresh));

        assert_eq!(remove_cleared(&cache, cleared), 0);
        let kept = cache.get("k").map(|r| r.value().upgrade());
        assert_eq!(kept.flatten().as_deref(), Some(&2));
    }

    #[test]
    fn test_clear_notice_posts_on_drop() {
        let queue = Arc::new(ReferenceQueue::new());
        let notice = ClearNotice::new(Arc::clone(&queue), 7);
        assert!(queue.is_empty());
        drop(notice);
        assert_eq!(queue.poll(), Some(7));
    }
}
