// klujur-runtime - Callable function values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function values.
//!
//! A [`Callable`] is anything that can be invoked with a slice of arguments.
//! [`Function`] is the cheap, shareable handle stored in `Value::Fn`; it
//! compares and hashes by identity.
//!
//! Submodules:
//! - `meta_fn`: the metadata decorator returned by [`Function::with_meta`]
//! - `native`: host closures with arity tables
//! - `comparator`: using functions as sort comparators
//! - `cache`: the per-function call-site dispatch cache

pub mod cache;
pub mod comparator;
pub mod meta_fn;
pub mod native;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use im::Vector;

use crate::error::Result;
use crate::hash::identity_hash;
use crate::value::{Meta, Value};

pub use cache::{CallSiteCache, MethodImplCache};
pub use comparator::{
    CompareResult, binary_search_by_fn, compare_with, predicate_comparator, sort_by_fn,
    three_way_comparator,
};
pub use meta_fn::MetaFn;
pub use native::{Arity, NativeFn, make_native_fn};

/// A complete argument list as one persistent sequence.
pub type ArgSeq = Vector<Value>;

/// The function-value contract.
pub trait Callable: Send + Sync + 'static {
    /// Raw internal name, as used in error messages (before demunging).
    fn name(&self) -> &str;

    /// Apply the function to positional arguments.
    ///
    /// Checking the argument count is the callable's own job; a count it
    /// does not support fails with [`crate::error::ArityError`].
    fn invoke(&self, args: &[Value]) -> Result<Value>;

    /// Apply the function to a complete argument list.
    fn apply_to(&self, args: ArgSeq) -> Result<Value> {
        let args: Vec<Value> = args.into_iter().collect();
        self.invoke(&args)
    }

    fn meta(&self) -> Option<&Arc<Meta>> {
        None
    }

    /// Minimum argument count for variadic callables, if declared.
    fn required_arity(&self) -> Option<usize> {
        None
    }

    /// Dispatch cache for protocol call sites, if this callable has one.
    fn call_site_cache(&self) -> Option<&CallSiteCache> {
        None
    }

    /// The callable this one decorates, for decorators.
    fn decorated(&self) -> Option<&Function> {
        None
    }
}

/// Shared handle to a callable.
#[derive(Clone)]
pub struct Function {
    inner: Arc<dyn Callable>,
}

impl Function {
    pub fn new(callable: impl Callable) -> Self {
        Function {
            inner: Arc::new(callable),
        }
    }

    pub fn from_arc(inner: Arc<dyn Callable>) -> Self {
        Function { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.inner.invoke(args)
    }

    pub fn apply_to(&self, args: ArgSeq) -> Result<Value> {
        self.inner.apply_to(args)
    }

    pub fn meta(&self) -> Option<&Arc<Meta>> {
        self.inner.meta()
    }

    pub fn required_arity(&self) -> Option<usize> {
        self.inner.required_arity()
    }

    pub fn call_site_cache(&self) -> Option<&CallSiteCache> {
        self.inner.call_site_cache()
    }

    pub fn callable(&self) -> &dyn Callable {
        self.inner.as_ref()
    }

    /// Return a function that behaves like this one with `meta` attached.
    ///
    /// `None` returns this same function. Metadata that is already this
    /// function's (the same allocation) also returns this function.
    /// Otherwise the result decorates the undecorated original, so
    /// repeated `with_meta` calls never stack decorators.
    pub fn with_meta(&self, meta: Option<Arc<Meta>>) -> Function {
        let Some(meta) = meta else {
            return self.clone();
        };
        if self.meta().is_some_and(|current| Arc::ptr_eq(current, &meta)) {
            return self.clone();
        }
        let target = self.inner.decorated().unwrap_or(self).clone();
        Function::new(MetaFn::new(target, meta))
    }

    /// Use this function as a comparator (see [`compare_with`]).
    pub fn compare(&self, a: &Value, b: &Value) -> Result<i32> {
        compare_with(self, a, b)
    }

    /// Whether both handles share one callable.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }

    pub fn identity_hash(&self) -> i32 {
        identity_hash(Arc::as_ptr(&self.inner))
    }
}

impl<C: Callable> From<C> for Function {
    fn from(callable: C) -> Self {
        Function::new(callable)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<fn {}>", self.name())
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Function {}

impl Hash for Function {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.identity_hash());
    }
}
