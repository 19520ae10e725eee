// klujur-runtime - Value identity and invocation core for Klujur
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # klujur-runtime
//!
//! The value-identity and invocation core of the Klujur runtime: value
//! equivalence, hashing and ordering across numeric and collection
//! boundaries, callable function values with metadata and arity checking,
//! and the weak-cache sweep used by interning tables.

pub mod collection;
pub mod config;
pub mod demunge;
pub mod equiv;
pub mod error;
pub mod function;
pub mod hash;
pub mod keyword;
pub mod murmur3;
pub mod numbers;
pub mod object;
pub mod reaper;
pub mod symbol;
pub mod value;

pub use config::{
    ARITY_DISPLAY_LIMIT, get_print_length, set_print_length, set_sweep_on_intern,
    sweep_on_intern,
};
pub use demunge::{demunge, munge};
pub use equiv::{
    EquivPred, class_of, compare, equals, equiv, equiv_bool, equiv_char, equiv_double,
    equiv_long, equiv_pred, identical,
};
pub use error::{ArityError, Error, ErrorKind, Result};
pub use function::{
    ArgSeq, Arity, CallSiteCache, Callable, CompareResult, Function, MetaFn, MethodImplCache,
    NativeFn, make_native_fn,
};
pub use hash::{hash, hash_combine, hash_ordered, hash_unordered, hasheq};
pub use im::{HashMap, HashSet, Vector};
pub use keyword::Keyword;
pub use num_bigint::BigInt;
pub use numbers::{Num, Ratio};
pub use object::{Collection, Comparable, HashEq, Object};
pub use reaper::{CachedRef, ClearNotice, ReferenceQueue, clear_cache};
pub use symbol::Symbol;
pub use value::{Category, Meta, TypeKey, Value};
