// klujur-runtime - Keyword type with weak interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-evaluating identifiers that may be optionally namespaced.
//!
//! # Interning
//!
//! Keywords are interned: two keywords with the same namespace and name share
//! one allocation, so equality and hashing are pointer operations.
//!
//! # Memory Behaviour
//!
//! The intern table holds weak references. A keyword that nothing refers to
//! any more is dropped, posts a notice to the table's reference queue, and its
//! dead entry is swept by a later call to [`Keyword::intern`] (see
//! [`crate::reaper`]), or by [`Keyword::sweep`] when interning sweeps are
//! turned off. Programs that generate many unique keywords from input
//! therefore do not grow the table without bound.
//!
//! # Thread Safety
//!
//! The table is a sharded concurrent map. Interning from many threads at once
//! always yields a single live keyword per name.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use crate::config::sweep_on_intern;
use crate::reaper::{ClearNotice, ReferenceQueue, clear_cache};
use crate::symbol::Symbol;

/// A keyword with optional namespace.
///
/// Keywords are self-evaluating and are interned for efficient comparison.
/// They always start with a colon `:` when printed.
#[derive(Clone)]
pub struct Keyword {
    inner: Arc<KeywordInner>,
}

#[derive(Debug)]
struct KeywordInner {
    sym: Symbol,
    hasheq: i32,
    _notice: ClearNotice,
}

struct KeywordTable {
    entries: DashMap<Symbol, Weak<KeywordInner>>,
    queue: Arc<ReferenceQueue>,
}

/// Global keyword table
static KEYWORD_TABLE: OnceLock<KeywordTable> = OnceLock::new();

fn table() -> &'static KeywordTable {
    KEYWORD_TABLE.get_or_init(|| KeywordTable {
        entries: DashMap::new(),
        queue: Arc::new(ReferenceQueue::new()),
    })
}

impl Keyword {
    /// Create (or find) a keyword with no namespace.
    pub fn new(name: &str) -> Self {
        Keyword::intern(Symbol::new(name))
    }

    /// Create (or find) a keyword with a namespace.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Keyword::intern(Symbol::with_namespace(namespace, name))
    }

    /// Parse a keyword from a string like "foo" or "ns/foo" (without the
    /// leading colon).
    pub fn parse(s: &str) -> Self {
        Keyword::intern(Symbol::parse(s))
    }

    /// Intern the keyword for `sym`.
    pub fn intern(sym: Symbol) -> Self {
        if sweep_on_intern() {
            Keyword::sweep();
        }
        let table = table();

        match table.entries.entry(sym.clone()) {
            Entry::Occupied(mut occupied) => {
                if let Some(inner) = occupied.get().upgrade() {
                    return Keyword { inner };
                }
                // The entry died in the interim: replace it in place
                trace!(keyword = %sym, "replacing cleared keyword entry");
                let inner = new_inner(&table.queue, sym);
                occupied.insert(Arc::downgrade(&inner));
                Keyword { inner }
            }
            Entry::Vacant(vacant) => {
                let inner = new_inner(&table.queue, sym);
                vacant.insert(Arc::downgrade(&inner));
                Keyword { inner }
            }
        }
    }

    /// Remove dead entries from the intern table. Returns the number removed.
    ///
    /// Interning runs this sweep itself unless it was turned off with
    /// [`crate::config::set_sweep_on_intern`]; callers that turn it off must
    /// call this periodically, or clearance notices and dead entries
    /// accumulate.
    pub fn sweep() -> usize {
        let table = table();
        clear_cache(&table.queue, &table.entries)
    }

    /// Find an existing live keyword without interning a new one.
    pub fn find(sym: &Symbol) -> Option<Self> {
        table()
            .entries
            .get(sym)
            .and_then(|entry| entry.value().upgrade())
            .map(|inner| Keyword { inner })
    }

    /// Get the namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.inner.sym.namespace()
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.sym.name()
    }

    /// The underlying symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.inner.sym
    }

    /// Host hash: the symbol's hash offset by the golden-ratio constant.
    pub fn hash_code(&self) -> i32 {
        self.inner.sym.hash_code().wrapping_add(0x9e3779b9_u32 as i32)
    }

    /// Value hash, computed once at intern time.
    pub fn hasheq(&self) -> i32 {
        self.inner.hasheq
    }
}

fn new_inner(queue: &Arc<ReferenceQueue>, sym: Symbol) -> Arc<KeywordInner> {
    let hasheq = sym.hasheq().wrapping_add(0x9e3779b9_u32 as i32);
    Arc::new_cyclic(|weak: &Weak<KeywordInner>| KeywordInner {
        sym,
        hasheq,
        _notice: ClearNotice::new(Arc::clone(queue), weak.as_ptr() as usize),
    })
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.inner.sym)
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        // Due to interning, pointer comparison is sufficient
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Keyword {}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.sym.cmp(&other.inner.sym)
    }
}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.inner.hasheq);
    }
}

// ============================================================================
// Tests
// ============================================================================
