// klujur-runtime - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for klujur-runtime integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::any::Any;
use std::sync::Arc;

#[allow(unused_imports)]
pub use klujur_runtime::{
    Arity, Collection, Error, Function, HashEq, Keyword, Meta, Object, Result, Symbol, Value,
    Vector, make_native_fn,
};

/// Shorthand for an integer vector value.
pub fn int_vec(ns: &[i64]) -> Value {
    Value::vector(ns.iter().map(|&n| Value::int(n)).collect())
}

/// Shorthand for an integer list value.
pub fn int_list(ns: &[i64]) -> Value {
    Value::list(ns.iter().map(|&n| Value::int(n)).collect())
}

/// Metadata with a single `key -> true` entry.
pub fn meta_with(key: &str) -> Arc<Meta> {
    Arc::new([(Value::keyword(key), Value::Bool(true))].into_iter().collect())
}

/// A two-argument "less than" predicate over the natural ordering.
pub fn less_than() -> Function {
    make_native_fn("less_than", Arity::fixed(&[2]), |args| {
        Ok(Value::Bool(klujur_runtime::compare(&args[0], &args[1])? < 0))
    })
}

/// A function that sums its integer arguments, with fixed arities 0 to 3
/// and a variadic arity from 5.
pub fn sum_fn() -> Function {
    make_native_fn(
        "sum_ints",
        Arity::fixed(&[0, 1, 2, 3]).or_more(5),
        |args| {
            let mut total = 0i64;
            for arg in args {
                match arg {
                    Value::Int(n) => total += n,
                    other => return Err(Error::type_error_in("sum-ints", "int", other.type_name())),
                }
            }
            Ok(Value::int(total))
        },
    )
}

/// A host sequential collection, equivalent to lists and vectors with the
/// same elements.
#[derive(Debug)]
pub struct Pair(pub Value, pub Value);

impl Object for Pair {
    fn type_name(&self) -> &'static str {
        "pair"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

impl Collection for Pair {
    fn equiv(&self, other: &Value) -> bool {
        match other {
            Value::List(items, _) | Value::Vector(items, _) => {
                items.len() == 2
                    && klujur_runtime::equiv(&self.0, &items[0])
                    && klujur_runtime::equiv(&self.1, &items[1])
            }
            Value::Object(obj) => obj
                .as_collection()
                .filter(|c| c.is_sequential())
                .and_then(|c| c.seq())
                .is_some_and(|items| {
                    items.len() == 2
                        && klujur_runtime::equiv(&self.0, &items[0])
                        && klujur_runtime::equiv(&self.1, &items[1])
                }),
            _ => false,
        }
    }

    fn hasheq(&self) -> i32 {
        klujur_runtime::hash_ordered([&self.0, &self.1])
    }

    fn count(&self) -> usize {
        2
    }

    fn is_sequential(&self) -> bool {
        true
    }

    fn seq(&self) -> Option<Vec<Value>> {
        Some(vec![self.0.clone(), self.1.clone()])
    }
}

/// A host value with content equality and a fixed value hash.
#[derive(Debug)]
pub struct Tagged(pub &'static str);

impl Object for Tagged {
    fn type_name(&self) -> &'static str {
        "tagged"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<Tagged>()
            .is_some_and(|t| t.0 == self.0)
    }

    fn hash_code(&self) -> Option<i32> {
        Some(klujur_runtime::hash::string_hash(self.0))
    }

    fn as_hash_eq(&self) -> Option<&dyn HashEq> {
        Some(self)
    }
}

impl HashEq for Tagged {
    fn hasheq(&self) -> i32 {
        klujur_runtime::murmur3::hash_int(klujur_runtime::hash::string_hash(self.0))
    }
}
