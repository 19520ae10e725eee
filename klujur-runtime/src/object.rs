// klujur-runtime - Host value capabilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Capability traits for values defined outside the core.
//!
//! A host type becomes a Klujur value by implementing [`Object`] and wrapping
//! itself in `Value::Object`. The equivalence, hash and ordering engines
//! then discover what the value can do through the optional capability
//! accessors instead of testing concrete types.

use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::value::Value;

/// A host-defined value.
pub trait Object: fmt::Debug + Send + Sync + 'static {
    /// Type name used in error messages and by `class_of`.
    fn type_name(&self) -> &'static str;

    /// Access to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Content equality. Identical objects are always equal and never reach
    /// this method; the default treats distinct objects as different.
    fn equals(&self, _other: &dyn Object) -> bool {
        false
    }

    /// Host hash consistent with [`Object::equals`]. `None` means the
    /// identity hash is used.
    fn hash_code(&self) -> Option<i32> {
        None
    }

    /// Structural equivalence, if this value is a collection.
    fn as_collection(&self) -> Option<&dyn Collection> {
        None
    }

    /// Explicit value hash, if this value provides one.
    fn as_hash_eq(&self) -> Option<&dyn HashEq> {
        None
    }

    /// Natural ordering, if this value has one.
    fn as_comparable(&self) -> Option<&dyn Comparable> {
        None
    }
}

/// A persistent collection, as seen by the equivalence engine.
///
/// Implementations must keep `equiv(a, b) => hasheq(a) == hasheq(b)`.
pub trait Collection {
    /// Structural equivalence against any value.
    fn equiv(&self, other: &Value) -> bool;

    /// Value hash consistent with [`Collection::equiv`].
    fn hasheq(&self) -> i32;

    /// Number of elements.
    fn count(&self) -> usize;

    /// Whether element order is part of this collection's identity. A
    /// sequential collection is equivalent to lists and vectors with the
    /// same elements, and must provide [`Collection::seq`].
    fn is_sequential(&self) -> bool {
        false
    }

    /// Elements in order, for sequential collections.
    fn seq(&self) -> Option<Vec<Value>> {
        None
    }
}

/// An explicit value hash.
pub trait HashEq {
    fn hasheq(&self) -> i32;
}

/// A natural ordering against other values.
pub trait Comparable {
    /// Three-way comparison, failing when `other` is not comparable with
    /// this value.
    fn compare_to(&self, other: &Value) -> Result<i32>;
}
