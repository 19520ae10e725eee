// klujur-runtime - Metadata decorator for functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The decorator returned by [`Function::with_meta`].
//!
//! A `MetaFn` knows nothing about which arities its target supports, so it
//! never calls the target's positional path. Every invocation collects the
//! arguments into one [`ArgSeq`] and hands them to the target's full
//! argument-list entrypoint.

use std::sync::Arc;

use super::{ArgSeq, Callable, Function};
use crate::error::Result;
use crate::value::{Meta, Value};

/// A function with replaced metadata.
pub struct MetaFn {
    target: Function,
    meta: Arc<Meta>,
}

impl MetaFn {
    pub fn new(target: Function, meta: Arc<Meta>) -> Self {
        MetaFn { target, meta }
    }

    /// The undecorated function.
    pub fn target(&self) -> &Function {
        &self.target
    }
}

impl Callable for MetaFn {
    fn name(&self) -> &str {
        self.target.name()
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.target.apply_to(args.iter().cloned().collect())
    }

    fn apply_to(&self, args: ArgSeq) -> Result<Value> {
        self.target.apply_to(args)
    }

    fn meta(&self) -> Option<&Arc<Meta>> {
        Some(&self.meta)
    }

    fn required_arity(&self) -> Option<usize> {
        Some(0)
    }

    fn decorated(&self) -> Option<&Function> {
        Some(&self.target)
    }
}
