// klujur-runtime - Structural equivalence for the built-in collections
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! [`Collection`] implementations for the persistent collections behind
//! `Value::List`, `Value::Vector`, `Value::Map` and `Value::Set`.
//!
//! Lists and vectors are both sequential: a list and a vector with
//! equivalent elements in the same order are equivalent, and they hash
//! alike. Host objects that expose a sequential view through
//! [`Collection::seq`] take part in the same comparison.

use im::{HashMap, HashSet, Vector};

use crate::equiv::{compare, equiv};
use crate::error::Result;
use crate::hash::{entry_hash, hash_ordered, hash_unordered};
use crate::murmur3;
use crate::object::Collection;
use crate::value::Value;

fn sequential_equiv<'a>(
    items: &Vector<Value>,
    len: usize,
    others: impl Iterator<Item = &'a Value>,
) -> bool {
    items.len() == len && items.iter().zip(others).all(|(a, b)| equiv(a, b))
}

impl Collection for Vector<Value> {
    fn equiv(&self, other: &Value) -> bool {
        match other {
            Value::List(items, _) | Value::Vector(items, _) => {
                sequential_equiv(self, items.len(), items.iter())
            }
            Value::Object(obj) => obj
                .as_collection()
                .filter(|coll| coll.is_sequential())
                .and_then(|coll| coll.seq())
                .is_some_and(|items| sequential_equiv(self, items.len(), items.iter())),
            _ => false,
        }
    }

    fn hasheq(&self) -> i32 {
        hash_ordered(self.iter())
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn is_sequential(&self) -> bool {
        true
    }

    fn seq(&self) -> Option<Vec<Value>> {
        Some(self.iter().cloned().collect())
    }
}

impl Collection for HashMap<Value, Value> {
    fn equiv(&self, other: &Value) -> bool {
        match other {
            Value::Map(map, _) => {
                self.len() == map.len()
                    && self
                        .iter()
                        .all(|(k, v)| map.get(k).is_some_and(|other_v| equiv(v, other_v)))
            }
            _ => false,
        }
    }

    fn hasheq(&self) -> i32 {
        let sum = self
            .iter()
            .fold(0i32, |h, (k, v)| h.wrapping_add(entry_hash(k, v)));
        murmur3::mix_coll_hash(sum, self.len())
    }

    fn count(&self) -> usize {
        self.len()
    }
}

impl Collection for HashSet<Value> {
    fn equiv(&self, other: &Value) -> bool {
        match other {
            Value::Set(set, _) => {
                self.len() == set.len() && self.iter().all(|item| set.contains(item))
            }
            _ => false,
        }
    }

    fn hasheq(&self) -> i32 {
        hash_unordered(self.iter())
    }

    fn count(&self) -> usize {
        self.len()
    }
}

/// Vector ordering: shorter vectors sort first, equal lengths compare
/// element by element.
pub fn compare_vectors(a: &Vector<Value>, b: &Vector<Value>) -> Result<i32> {
    if a.len() != b.len() {
        return Ok(if a.len() < b.len() { -1 } else { 1 });
    }
    for (x, y) in a.iter().zip(b.iter()) {
        let c = compare(x, y)?;
        if c != 0 {
            return Ok(c);
        }
    }
    Ok(0)
}
