// klujur-runtime - Call-site dispatch cache
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Per-function cache of type-based dispatch decisions.
//!
//! A protocol function resolves the implementation for its first
//! argument's type at every call. The resolution is deterministic, so a
//! function may remember it in a [`CallSiteCache`]: an atomically swappable
//! slot holding an immutable [`MethodImplCache`] snapshot.
//!
//! Readers never block and never see a partially updated table. Writers
//! replace the whole snapshot; when two writers race, one result is
//! discarded, which costs only a repeated resolution.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use im::HashMap;
use tracing::trace;

use super::Function;
use crate::value::{TypeKey, Value};

/// Immutable dispatch table from runtime type to implementation.
#[derive(Clone, Debug, Default)]
pub struct MethodImplCache {
    table: HashMap<TypeKey, Function>,
}

impl MethodImplCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The implementation cached for `key`.
    pub fn lookup(&self, key: &TypeKey) -> Option<&Function> {
        self.table.get(key)
    }

    /// The implementation cached for `target`'s type. Nil has no type and
    /// never hits.
    pub fn lookup_value(&self, target: &Value) -> Option<&Function> {
        target.type_key().and_then(|key| self.table.get(&key))
    }

    /// A new snapshot with one more entry. `self` is unchanged.
    pub fn with_entry(&self, key: TypeKey, implementation: Function) -> Self {
        MethodImplCache {
            table: self.table.update(key, implementation),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<(TypeKey, Function)> for MethodImplCache {
    fn from_iter<I: IntoIterator<Item = (TypeKey, Function)>>(iter: I) -> Self {
        MethodImplCache {
            table: iter.into_iter().collect(),
        }
    }
}

/// Lazily populated, thread-shared slot for a [`MethodImplCache`].
#[derive(Debug, Default)]
pub struct CallSiteCache {
    slot: ArcSwapOption<MethodImplCache>,
}

impl CallSiteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, if populated.
    pub fn load(&self) -> Option<Arc<MethodImplCache>> {
        self.slot.load_full()
    }

    pub fn is_populated(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Replace the snapshot unconditionally.
    pub fn store(&self, cache: MethodImplCache) {
        self.slot.store(Some(Arc::new(cache)));
    }

    /// Return the snapshot, building it with `populate` if the slot is
    /// empty.
    ///
    /// Only the first writer's snapshot is installed. A writer that loses
    /// the race discards its own and returns the winner's.
    pub fn get_or_populate(
        &self,
        populate: impl FnOnce() -> MethodImplCache,
    ) -> Arc<MethodImplCache> {
        if let Some(cache) = self.slot.load_full() {
            return cache;
        }
        let fresh = Arc::new(populate());
        let empty: Option<Arc<MethodImplCache>> = None;
        let previous = self.slot.compare_and_swap(&empty, Some(Arc::clone(&fresh)));
        match &*previous {
            Some(winner) => {
                trace!("call-site cache populated concurrently, discarding result");
                Arc::clone(winner)
            }
            None => {
                trace!(entries = fresh.len(), "call-site cache populated");
                fresh
            }
        }
    }

    /// Find the implementation for `target`'s type, resolving and caching
    /// it on a miss. Nil and unresolvable types are never cached.
    pub fn resolve(
        &self,
        target: &Value,
        resolver: impl FnOnce(&TypeKey) -> Option<Function>,
    ) -> Option<Function> {
        let key = target.type_key()?;
        let snapshot = self.slot.load_full();
        if let Some(hit) = snapshot.as_ref().and_then(|c| c.lookup(&key)) {
            return Some(hit.clone());
        }
        let implementation = resolver(&key)?;
        self.slot.rcu(|current| {
            let base = current.as_deref().cloned().unwrap_or_default();
            Some(Arc::new(base.with_entry(key.clone(), implementation.clone())))
        });
        trace!(type_key = ?key, "call-site cache extended");
        Some(implementation)
    }

    /// Empty the slot.
    pub fn clear(&self) {
        self.slot.store(None);
    }
}
