// klujur-runtime - Native (Rust) functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Host closures exposed as function values.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{CallSiteCache, Callable, Function};
use crate::error::{ArityError, Result};
use crate::value::{Meta, Value};

/// Type-erased native function body.
pub type NativeFnImpl = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// Supported argument counts: any number of fixed counts plus an optional
/// variadic arity accepting a minimum count or more.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arity {
    fixed: Vec<usize>,
    variadic: Option<usize>,
}

impl Arity {
    /// Exactly the given counts.
    pub fn fixed(counts: &[usize]) -> Self {
        Arity {
            fixed: counts.to_vec(),
            variadic: None,
        }
    }

    /// `min` or more arguments.
    pub fn variadic(min: usize) -> Self {
        Arity {
            fixed: Vec::new(),
            variadic: Some(min),
        }
    }

    /// Add a variadic arity to a fixed table.
    pub fn or_more(mut self, min: usize) -> Self {
        self.variadic = Some(min);
        self
    }

    /// Check if this table accepts the given number of arguments.
    pub fn matches(&self, arg_count: usize) -> bool {
        self.fixed.contains(&arg_count) || self.variadic.is_some_and(|min| arg_count >= min)
    }

    /// Minimum count of the variadic arity, if any.
    pub fn required(&self) -> Option<usize> {
        self.variadic
    }
}

/// A native (Rust) function.
pub struct NativeFn {
    name: Arc<str>,
    arity: Arity,
    func: Box<NativeFnImpl>,
    meta: Option<Arc<Meta>>,
    cache: Option<CallSiteCache>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<Arc<str>>,
        arity: Arity,
        func: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        NativeFn {
            name: name.into(),
            arity,
            func: Box::new(func),
            meta: None,
            cache: None,
        }
    }

    /// Attach metadata at construction.
    pub fn with_meta(mut self, meta: Arc<Meta>) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Give this function a call-site dispatch cache.
    pub fn with_call_site_cache(mut self) -> Self {
        self.cache = Some(CallSiteCache::new());
        self
    }

    pub fn arity(&self) -> &Arity {
        &self.arity
    }
}

impl Callable for NativeFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        if !self.arity.matches(args.len()) {
            debug!(function = %self.name, actual = args.len(), "arity mismatch");
            return Err(ArityError::new(args.len(), &*self.name).into());
        }
        (self.func)(args)
    }

    fn meta(&self) -> Option<&Arc<Meta>> {
        self.meta.as_ref()
    }

    fn required_arity(&self) -> Option<usize> {
        self.arity.required()
    }

    fn call_site_cache(&self) -> Option<&CallSiteCache> {
        self.cache.as_ref()
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}

/// Helper to create a native function value.
pub fn make_native_fn(
    name: &'static str,
    arity: Arity,
    func: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
) -> Function {
    Function::new(NativeFn::new(name, arity, func))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};

    #[test]
    fn test_arity_table() {
        let arity = Arity::fixed(&[0, 2]).or_more(4);
        assert!(arity.matches(0));
        assert!(!arity.matches(1));
        assert!(arity.matches(2));
        assert!(!arity.matches(3));
        assert!(arity.matches(4));
        assert!(arity.matches(40));
        assert_eq!(arity.required(), Some(4));
        assert_eq!(Arity::fixed(&[1]).required(), None);
    }

    #[test]
    fn test_invoke_checks_arity() {
        let inc = make_native_fn("inc", Arity::fixed(&[1]), |args| match &args[0] {
            Value::Int(n) => Ok(Value::int(n + 1)),
            other => Err(Error::type_error_in("inc", "number", other.type_name())),
        });
        assert_eq!(inc.invoke(&[Value::int(1)]).unwrap(), Value::int(2));

        let err = inc.invoke(&[Value::int(1), Value::int(2)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Wrong number of args (2) passed to: inc");
    }

    #[test]
    fn test_apply_to_uses_positional_path() {
        let first = make_native_fn("first", Arity::variadic(1), |args| Ok(args[0].clone()));
        let args: super::super::ArgSeq = [Value::int(7), Value::int(8)].into_iter().collect();
        assert_eq!(first.apply_to(args).unwrap(), Value::int(7));
    }

    #[test]
    fn test_munged_name_is_demunged_in_errors() {
        let f = Function::new(NativeFn::new("clojure.core$even_QMARK_", Arity::fixed(&[1]), |_| {
            Ok(Value::Nil)
        }));
        let err = f.invoke(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Wrong number of args (0) passed to: clojure.core/even?");
        assert_eq!(err.as_arity().map(|e| e.name()), Some("clojure.core$even_QMARK_"));
    }

    #[test]
    fn test_native_meta_and_cache() {
        let meta: Arc<Meta> = Arc::new([(Value::keyword("k"), Value::int(1))].into_iter().collect());
        let f = NativeFn::new("f", Arity::variadic(0), |_| Ok(Value::Nil))
            .with_meta(Arc::clone(&meta))
            .with_call_site_cache();
        assert!(f.meta().is_some_and(|m| Arc::ptr_eq(m, &meta)));
        assert!(f.call_site_cache().is_some());
    }
}
