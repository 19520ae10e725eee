// klujur-runtime - Numeric tower entrypoints
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Equality, ordering and hashing across numeric representations.
//!
//! The tower has four representations: 64-bit integers, arbitrary-precision
//! integers, 64-bit floats and arbitrary-precision ratios. Numbers compare by
//! mathematical value, so `3`, `3N` and `3.0` are all equal and hash alike.
//!
//! Floats are compared against exact numbers through their exact dyadic
//! rational value (every finite double is one), which keeps numeric equality
//! transitive. Only arithmetic-free entrypoints live here.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::hash::double_hash;
use crate::murmur3;

/// An arbitrary-precision ratio in lowest terms.
///
/// The denominator is always positive and never 1: integral values are
/// represented as integers instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ratio {
    numer: BigInt,
    denom: BigInt,
}

impl Ratio {
    /// Reduce `numer/denom` to lowest terms with a positive denominator.
    ///
    /// Returns `None` for a zero denominator.
    pub fn reduce(numer: BigInt, denom: BigInt) -> Option<(BigInt, BigInt)> {
        if denom.is_zero() {
            return None;
        }
        let g = gcd(numer.abs(), denom.abs());
        let (mut numer, mut denom) = (numer / &g, denom / &g);
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        Some((numer, denom))
    }

    /// Build a ratio from already-reduced parts whose denominator is not 1.
    pub(crate) fn from_reduced(numer: BigInt, denom: BigInt) -> Self {
        debug_assert!(denom > BigInt::one());
        Ratio { numer, denom }
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

fn gcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    while !b.is_zero() {
        let t = &a % &b;
        a = b;
        b = t;
    }
    if a.is_zero() { BigInt::one() } else { a }
}

/// Borrowed view of a numeric value.
#[derive(Clone, Copy, Debug)]
pub enum Num<'a> {
    Int(i64),
    BigInt(&'a BigInt),
    Float(f64),
    Ratio(&'a Ratio),
}

/// Exact value as reduced `(numer, denom)`, or `None` for NaN and infinities.
fn exact_parts(n: Num<'_>) -> Option<(BigInt, BigInt)> {
    match n {
        Num::Int(i) => Some((BigInt::from(i), BigInt::one())),
        Num::BigInt(b) => Some((b.clone(), BigInt::one())),
        Num::Ratio(r) => Some((r.numer.clone(), r.denom.clone())),
        Num::Float(f) => float_parts(f),
    }
}

/// The exact rational value of a finite double, in lowest terms.
fn float_parts(f: f64) -> Option<(BigInt, BigInt)> {
    if !f.is_finite() {
        return None;
    }
    if f == 0.0 {
        return Some((BigInt::zero(), BigInt::one()));
    }

    let bits = f.to_bits();
    let negative = bits >> 63 == 1;
    let biased_exp = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);

    // value = mantissa * 2^exp
    let (mut mantissa, mut exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exp - 1075)
    };

    if exp < 0 {
        let shift = (mantissa.trailing_zeros() as i64).min(-exp);
        mantissa >>= shift;
        exp += shift;
    }

    let magnitude = BigInt::from(mantissa);
    let numer = if negative { -magnitude } else { magnitude };
    if exp >= 0 {
        Some((numer << (exp as usize), BigInt::one()))
    } else {
        Some((numer, BigInt::one() << ((-exp) as usize)))
    }
}

/// Numeric equality by mathematical value.
pub fn equal(a: Num<'_>, b: Num<'_>) -> bool {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x == y,
        (Num::Float(x), Num::Float(y)) => x == y,
        (Num::Float(f), _) | (_, Num::Float(f)) if !f.is_finite() => false,
        _ => match (exact_parts(a), exact_parts(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// Three-way numeric comparison returning -1, 0 or 1.
///
/// NaN is neither less nor greater than anything, so it compares as 0.
pub fn compare(a: Num<'_>, b: Num<'_>) -> i32 {
    let ordering = match (a, b) {
        (Num::Int(x), Num::Int(y)) => x.cmp(&y),
        (Num::Float(x), Num::Float(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Num::Float(f), _) if !f.is_finite() => float_bound_ordering(f),
        (_, Num::Float(f)) if !f.is_finite() => float_bound_ordering(f).reverse(),
        _ => match (exact_parts(a), exact_parts(b)) {
            // Denominators are positive, so cross-multiplication keeps order
            (Some((an, ad)), Some((bn, bd))) => (an * bd).cmp(&(bn * ad)),
            _ => Ordering::Equal,
        },
    };
    ordering_to_int(ordering)
}

/// Ordering of a non-finite float against any finite value.
fn float_bound_ordering(f: f64) -> Ordering {
    if f.is_nan() {
        Ordering::Equal
    } else if f > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

pub(crate) fn ordering_to_int(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Value hash, equal for equal mathematical values in any representation.
pub fn hasheq(n: Num<'_>) -> i32 {
    match n {
        Num::Int(i) => murmur3::hash_long(i),
        Num::BigInt(b) => integer_hash(b),
        Num::Ratio(r) => ratio_hash(&r.numer, &r.denom),
        Num::Float(f) => {
            if f == 0.0 {
                // 0.0 and -0.0 are equal
                return 0;
            }
            if !f.is_finite() {
                return double_hash(f);
            }
            if f.fract() == 0.0 && f >= -9.223_372_036_854_775_808e18 && f < 9.223_372_036_854_775_808e18
            {
                return murmur3::hash_long(f as i64);
            }
            match float_parts(f) {
                Some((numer, denom)) if denom.is_one() => integer_hash(&numer),
                Some((numer, denom)) => ratio_hash(&numer, &denom),
                None => double_hash(f),
            }
        }
    }
}

fn integer_hash(b: &BigInt) -> i32 {
    match b.to_i64() {
        Some(i) => murmur3::hash_long(i),
        None => big_digit_hash(b),
    }
}

fn ratio_hash(numer: &BigInt, denom: &BigInt) -> i32 {
    integer_hash(numer) ^ integer_hash(denom)
}

/// Host-style hash over the magnitude's 32-bit digits, most significant
/// first, signed by the number's sign.
pub(crate) fn big_digit_hash(b: &BigInt) -> i32 {
    let (sign, digits) = b.to_u32_digits();
    let h = digits
        .iter()
        .rev()
        .fold(0i32, |h, &d| h.wrapping_mul(31).wrapping_add(d as i32));
    match sign {
        Sign::Minus => h.wrapping_neg(),
        Sign::NoSign => 0,
        Sign::Plus => h,
    }
}

/// Narrow a number to a 32-bit int the way a host `intValue` does: low
/// 32 bits for integers, saturating truncation for floats and ratios.
pub fn int_value(n: Num<'_>) -> i32 {
    match n {
        Num::Int(i) => i as i32,
        Num::BigInt(b) => {
            let (sign, digits) = b.to_u32_digits();
            let low = digits.first().copied().unwrap_or(0) as i32;
            if sign == Sign::Minus { low.wrapping_neg() } else { low }
        }
        Num::Float(f) => f as i32,
        Num::Ratio(r) => {
            // BigInt division truncates toward zero
            let q = &r.numer / &r.denom;
            q.to_i32().unwrap_or(if q.is_negative() { i32::MIN } else { i32::MAX })
        }
    }
}

/// Approximate a number as a double.
pub fn to_f64(n: Num<'_>) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::BigInt(b) => b.to_f64().unwrap_or(f64::NAN),
        Num::Float(f) => f,
        Num::Ratio(r) => match (r.numer.to_f64(), r.denom.to_f64()) {
            (Some(n), Some(d)) if n.is_finite() && d.is_finite() => n / d,
            _ => (&r.numer / &r.denom).to_f64().unwrap_or(f64::NAN),
        },
    }
}
