// klujur-runtime - Value types for Klujur
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for Klujur.
//!
//! `Value` is the central enum representing all Klujur values. Equivalence,
//! hashing and ordering dispatch on a value's [`Category`] rather than on
//! its concrete variant, so numbers compare across representations and
//! sequential collections compare across list and vector.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use im::{HashMap, HashSet, Vector};
use num_bigint::BigInt;

use crate::config::get_print_length;
use crate::equiv::equiv;
use crate::error::{Error, Result};
use crate::function::Function;
use crate::hash::{double_hash, hasheq, identity_hash, long_hash, string_hash};
use crate::keyword::Keyword;
use crate::numbers::{Num, Ratio, big_digit_hash};
use crate::object::{Collection, Object};
use crate::symbol::Symbol;

/// Metadata: an immutable map of values to values.
///
/// Metadata never affects equality, hashing or ordering.
pub type Meta = HashMap<Value, Value>;

// ============================================================================
// Dispatch categories
// ============================================================================

/// The dispatch category of a value.
///
/// Equivalence, hashing and ordering choose their strategy from this tag.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Category {
    Null,
    Number,
    Sequential,
    Collection,
    Other,
}

/// Runtime type of a non-nil value.
///
/// Coarser than the `Value` enum where representations share behaviour
/// (all functions are `Fn`), finer where host objects differ by type name.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum TypeKey {
    Bool,
    Int,
    BigInt,
    Float,
    Ratio,
    Char,
    String,
    Symbol,
    Keyword,
    List,
    Vector,
    Map,
    Set,
    Fn,
    /// Host object types, by type name
    Object(&'static str),
}

// ============================================================================
// Value
// ============================================================================

/// The core value type for Klujur.
///
/// Values are immutable and cheap to clone. Types that support metadata
/// (List, Vector, Map, Set) carry an optional `Arc<Meta>`; functions carry
/// theirs on the callable.
#[derive(Clone)]
pub enum Value {
    /// The nil value, representing nothing/absence
    Nil,
    /// Boolean true or false
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// Arbitrary-precision integer
    BigInt(Arc<BigInt>),
    /// 64-bit floating point number
    Float(f64),
    /// Arbitrary-precision ratio in lowest terms
    Ratio(Arc<Ratio>),
    /// Unicode character
    Char(char),
    /// Immutable string
    String(Arc<str>),
    /// Symbol (optionally namespaced identifier)
    Symbol(Symbol),
    /// Keyword (optionally namespaced, interned)
    Keyword(Keyword),
    /// List (persistent, with optional metadata)
    List(Vector<Value>, Option<Arc<Meta>>),
    /// Indexed vector (persistent, with optional metadata)
    Vector(Vector<Value>, Option<Arc<Meta>>),
    /// Hash map keyed by value equivalence (with optional metadata)
    Map(HashMap<Value, Value>, Option<Arc<Meta>>),
    /// Hash set keyed by value equivalence (with optional metadata)
    Set(HashSet<Value>, Option<Arc<Meta>>),
    /// Callable function value
    Fn(Function),
    /// Host-defined value
    Object(Arc<dyn Object>),
}

impl Value {
    /// Create a nil value
    pub fn nil() -> Self {
        Value::Nil
    }

    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an integer value
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create an arbitrary-precision integer value.
    ///
    /// The value stays a `BigInt` even when it fits in 64 bits; it is still
    /// equivalent to the matching `Int`.
    pub fn bigint(n: impl Into<BigInt>) -> Self {
        Value::BigInt(Arc::new(n.into()))
    }

    /// Create a float value
    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    /// Create a ratio value (automatically reduces).
    ///
    /// An integral result becomes an integer; a zero denominator is an
    /// illegal argument.
    pub fn ratio(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Result<Self> {
        let (num, den) = Ratio::reduce(num.into(), den.into())
            .ok_or_else(|| Error::IllegalArgument("Divide by zero".into()))?;
        if den == BigInt::from(1) {
            return Ok(match i64::try_from(&num) {
                Ok(n) => Value::Int(n),
                Err(_) => Value::bigint(num),
            });
        }
        Ok(Value::Ratio(Arc::new(Ratio::from_reduced(num, den))))
    }

    /// Create a character value
    pub fn char(c: char) -> Self {
        Value::Char(c)
    }

    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Create a symbol value
    pub fn symbol(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }

    /// Create a keyword value
    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Keyword::parse(name))
    }

    /// Create a list from elements
    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(elements.into_iter().collect(), None)
    }

    /// Create a vector from elements
    pub fn vector(elements: Vec<Value>) -> Self {
        Value::Vector(elements.into_iter().collect(), None)
    }

    /// Create a map from key-value pairs
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs.into_iter().collect(), None)
    }

    /// Create a set from elements
    pub fn set(elements: Vec<Value>) -> Self {
        Value::Set(elements.into_iter().collect(), None)
    }

    /// Wrap a host object
    pub fn object(obj: impl Object) -> Self {
        Value::Object(Arc::new(obj))
    }

    /// Check if this value is nil
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Check if this value is truthy (not nil and not false)
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The dispatch category of this value.
    pub fn category(&self) -> Category {
        match self {
            Value::Nil => Category::Null,
            Value::Int(_) | Value::BigInt(_) | Value::Float(_) | Value::Ratio(_) => {
                Category::Number
            }
            Value::List(_, _) | Value::Vector(_, _) => Category::Sequential,
            Value::Map(_, _) | Value::Set(_, _) => Category::Collection,
            Value::Object(obj) => match obj.as_collection() {
                Some(coll) if coll.is_sequential() => Category::Sequential,
                Some(_) => Category::Collection,
                None => Category::Other,
            },
            _ => Category::Other,
        }
    }

    /// Numeric view, if this value is a number.
    pub fn as_number(&self) -> Option<Num<'_>> {
        match self {
            Value::Int(n) => Some(Num::Int(*n)),
            Value::BigInt(n) => Some(Num::BigInt(n)),
            Value::Float(n) => Some(Num::Float(*n)),
            Value::Ratio(r) => Some(Num::Ratio(r)),
            _ => None,
        }
    }

    /// Structural-equivalence capability, if this value is a collection.
    pub fn as_collection(&self) -> Option<&dyn Collection> {
        match self {
            Value::List(items, _) | Value::Vector(items, _) => Some(items),
            Value::Map(map, _) => Some(map),
            Value::Set(set, _) => Some(set),
            Value::Object(obj) => obj.as_collection(),
            _ => None,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Ratio(_) => "ratio",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_, _) => "list",
            Value::Vector(_, _) => "vector",
            Value::Map(_, _) => "map",
            Value::Set(_, _) => "set",
            Value::Fn(_) => "fn",
            Value::Object(obj) => obj.type_name(),
        }
    }

    /// Get the runtime type key, `None` for nil.
    pub fn type_key(&self) -> Option<TypeKey> {
        Some(match self {
            Value::Nil => return None,
            Value::Bool(_) => TypeKey::Bool,
            Value::Int(_) => TypeKey::Int,
            Value::BigInt(_) => TypeKey::BigInt,
            Value::Float(_) => TypeKey::Float,
            Value::Ratio(_) => TypeKey::Ratio,
            Value::Char(_) => TypeKey::Char,
            Value::String(_) => TypeKey::String,
            Value::Symbol(_) => TypeKey::Symbol,
            Value::Keyword(_) => TypeKey::Keyword,
            Value::List(_, _) => TypeKey::List,
            Value::Vector(_, _) => TypeKey::Vector,
            Value::Map(_, _) => TypeKey::Map,
            Value::Set(_, _) => TypeKey::Set,
            Value::Fn(_) => TypeKey::Fn,
            Value::Object(obj) => TypeKey::Object(obj.type_name()),
        })
    }

    /// Host hash, consistent with content equality. 0 for nil.
    pub fn hash_code(&self) -> i32 {
        match self {
            Value::Nil => 0,
            Value::Bool(true) => 1231,
            Value::Bool(false) => 1237,
            Value::Int(n) => long_hash(*n),
            Value::BigInt(n) => big_digit_hash(n),
            Value::Float(n) => double_hash(*n),
            Value::Ratio(r) => big_digit_hash(r.numer()) ^ big_digit_hash(r.denom()),
            Value::Char(c) => *c as i32,
            Value::String(s) => string_hash(s),
            Value::Symbol(sym) => sym.hash_code(),
            Value::Keyword(kw) => kw.hash_code(),
            Value::List(items, _) | Value::Vector(items, _) => items
                .iter()
                .fold(1i32, |h, item| h.wrapping_mul(31).wrapping_add(item.hash_code())),
            Value::Map(map, _) => map.iter().fold(0i32, |h, (k, v)| {
                h.wrapping_add(k.hash_code() ^ v.hash_code())
            }),
            Value::Set(set, _) => set
                .iter()
                .fold(0i32, |h, item| h.wrapping_add(item.hash_code())),
            Value::Fn(f) => f.identity_hash(),
            Value::Object(obj) => obj
                .hash_code()
                .unwrap_or_else(|| identity_hash(Arc::as_ptr(obj))),
        }
    }

    /// Get the metadata of this value, if any.
    pub fn meta(&self) -> Option<&Arc<Meta>> {
        match self {
            Value::List(_, meta)
            | Value::Vector(_, meta)
            | Value::Map(_, meta)
            | Value::Set(_, meta) => meta.as_ref(),
            Value::Fn(f) => f.meta(),
            _ => None,
        }
    }

    /// Return a new value with the given metadata.
    /// Returns None if the value type doesn't support metadata.
    pub fn with_meta(&self, meta: Option<Arc<Meta>>) -> Option<Value> {
        match self {
            Value::List(items, _) => Some(Value::List(items.clone(), meta)),
            Value::Vector(items, _) => Some(Value::Vector(items.clone(), meta)),
            Value::Map(m, _) => Some(Value::Map(m.clone(), meta)),
            Value::Set(s, _) => Some(Value::Set(s.clone(), meta)),
            Value::Fn(f) => Some(Value::Fn(f.with_meta(meta))),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Keyword> for Value {
    fn from(kw: Keyword) -> Self {
        Value::Keyword(kw)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Fn(f)
    }
}

// ============================================================================
// Display implementation
// ============================================================================

fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    let limit = get_print_length();
    write!(f, "{}", open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        if limit.is_some_and(|max| i >= max) {
            write!(f, "...")?;
            break;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Note: Metadata is not displayed
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}N", n),
            Value::Float(n) => {
                if n.is_nan() {
                    write!(f, "##NaN")
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        write!(f, "##Inf")
                    } else {
                        write!(f, "##-Inf")
                    }
                } else if n.fract() == 0.0 {
                    write!(f, "{}.0", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Ratio(r) => write!(f, "{}", r),
            Value::Char(c) => write!(f, "\\{}", format_char(*c)),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::Keyword(kw) => write!(f, "{}", kw),
            Value::List(items, _) => write_items(f, "(", ")", items.iter()),
            Value::Vector(items, _) => write_items(f, "[", "]", items.iter()),
            Value::Map(map, _) => {
                let limit = get_print_length();
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if limit.is_some_and(|max| i >= max) {
                        write!(f, "...")?;
                        break;
                    }
                    write!(f, "{} {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Set(set, _) => write_items(f, "#{", "}", set.iter()),
            Value::Fn(func) => write!(f, "#<fn {}>", func.name()),
            Value::Object(obj) => write!(f, "#object[{} {:?}]", obj.type_name(), obj),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

fn format_char(c: char) -> String {
    match c {
        '\n' => "newline".to_string(),
        ' ' => "space".to_string(),
        '\t' => "tab".to_string(),
        '\r' => "return".to_string(),
        '\x08' => "backspace".to_string(),
        '\x0C' => "formfeed".to_string(),
        _ => c.to_string(),
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}

// ============================================================================
// Equality and hashing (for use as map keys and set elements)
// ============================================================================

// Value equality is equivalence, and the std hash is the value hash, so
// `im` maps and sets of values key by equivalence.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equiv(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(hasheq(self));
    }
}

// ============================================================================
// Tests
// ============================================================================
