// klujur-runtime - Hashing
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Host hashes and value hashes.
//!
//! Every value has two 32-bit hashes:
//!
//! - [`hash`]: the host hash, consistent with content equality
//!   ([`crate::equiv::equals`]). Used where default equality suffices.
//! - [`hasheq`]: the value hash, consistent with [`crate::equiv::equiv`]
//!   across numeric and collection boundaries. Hash-keyed collections of
//!   values must use this one.
//!
//! Neither is memoised here; caching a collection's hash is the owning
//! collection's business.

use crate::murmur3;
use crate::numbers;
use crate::object::Collection;
use crate::value::Value;

/// Host hash, 0 for nil.
pub fn hash(v: &Value) -> i32 {
    v.hash_code()
}

/// Value hash, consistent with `equiv`.
///
/// Dispatch order: nil, explicit value-hash capability (collections,
/// symbols, keywords, host objects that provide one), numbers, strings
/// (Murmur3-mixed host hash), then the host hash.
pub fn hasheq(v: &Value) -> i32 {
    match v {
        Value::Nil => 0,
        Value::Symbol(sym) => sym.hasheq(),
        Value::Keyword(kw) => kw.hasheq(),
        Value::List(items, _) | Value::Vector(items, _) => items.hasheq(),
        Value::Map(map, _) => map.hasheq(),
        Value::Set(set, _) => set.hasheq(),
        Value::Object(obj) => {
            if let Some(h) = obj.as_hash_eq() {
                h.hasheq()
            } else if let Some(coll) = obj.as_collection() {
                coll.hasheq()
            } else {
                v.hash_code()
            }
        }
        Value::String(s) => murmur3::hash_int(string_hash(s)),
        _ => match v.as_number() {
            Some(n) => numbers::hasheq(n),
            None => v.hash_code(),
        },
    }
}

/// Fold one hash into a running seed.
///
/// `seed ^ (h + 0x9e3779b9 + (seed << 6) + (seed >> 2))` with wrapping
/// arithmetic and an arithmetic right shift. Order-sensitive.
pub fn hash_combine(seed: i32, h: i32) -> i32 {
    seed ^ h
        .wrapping_add(0x9e3779b9_u32 as i32)
        .wrapping_add(seed.wrapping_shl(6))
        .wrapping_add(seed >> 2)
}

/// Value hash of an ordered sequence of values.
pub fn hash_ordered<'a>(items: impl IntoIterator<Item = &'a Value>) -> i32 {
    let mut n = 0;
    let mut h = 1;
    for item in items {
        h = hash_combine(h, hasheq(item));
        n += 1;
    }
    murmur3::mix_coll_hash(h, n)
}

/// Value hash of an unordered collection of values.
pub fn hash_unordered<'a>(items: impl IntoIterator<Item = &'a Value>) -> i32 {
    let mut n = 0;
    let mut h = 0i32;
    for item in items {
        h = h.wrapping_add(hasheq(item));
        n += 1;
    }
    murmur3::mix_coll_hash(h, n)
}

/// A map entry hashes as the two-element vector `[k v]`.
pub fn entry_hash(k: &Value, v: &Value) -> i32 {
    hash_ordered([k, v])
}

/// Host string hash: the 31-polynomial over UTF-16 code units.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Host hash of a 64-bit integer.
pub fn long_hash(n: i64) -> i32 {
    (n ^ ((n as u64) >> 32) as i64) as i32
}

/// Host hash of a double. NaNs share one hash.
pub fn double_hash(f: f64) -> i32 {
    let bits = if f.is_nan() { 0x7ff8000000000000 } else { f.to_bits() };
    (bits ^ (bits >> 32)) as i32
}

/// Identity hash derived from an allocation address.
pub fn identity_hash<T: ?Sized>(ptr: *const T) -> i32 {
    let addr = ptr as *const () as usize as u64;
    murmur3::hash_long(addr as i64)
}
