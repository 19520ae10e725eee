// klujur-runtime - Equivalence and ordering
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Value equivalence, content equality and natural ordering.
//!
//! [`equiv`] is the equality used by the language and by hash-keyed
//! collections. It dispatches on the operands' [`Category`]: numbers compare
//! by mathematical value, collections compare structurally, and everything
//! else falls back to content equality ([`equals`]).

use std::sync::Arc;

use crate::collection;
use crate::error::{Error, Result};
use crate::numbers;
use crate::object::Object;
use crate::value::{Category, TypeKey, Value};

/// Whether two values are the same reference.
///
/// Nil, booleans and keywords are canonical, so equal ones are identical.
/// Other values are identical only when they share an allocation (or are
/// the same place in memory).
pub fn identical(a: &Value, b: &Value) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Keyword(x), Value::Keyword(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => Arc::ptr_eq(x, y),
        (Value::Ratio(x), Value::Ratio(y)) => Arc::ptr_eq(x, y),
        (Value::String(x), Value::String(y)) => Arc::ptr_eq(x, y),
        (Value::List(x, _), Value::List(y, _)) | (Value::Vector(x, _), Value::Vector(y, _)) => {
            x.ptr_eq(y)
        }
        (Value::Map(x, _), Value::Map(y, _)) => x.ptr_eq(y),
        (Value::Set(x, _), Value::Set(y, _)) => x.ptr_eq(y),
        (Value::Fn(x), Value::Fn(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => same_object(x, y),
        _ => false,
    }
}

fn same_object(a: &Arc<dyn Object>, b: &Arc<dyn Object>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Value equivalence.
///
/// Identical values are equivalent. Nil is equivalent only to nil. Two
/// numbers are equivalent when they have the same mathematical value. When
/// either operand is a collection, the left operand's structural equivalence
/// decides if it is a collection, otherwise the right operand's. Everything
/// else uses content equality.
pub fn equiv(a: &Value, b: &Value) -> bool {
    if identical(a, b) {
        return true;
    }
    match a.category() {
        Category::Null => b.is_nil(),
        Category::Number => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => numbers::equal(x, y),
            _ => equiv_structural_or_equals(a, b),
        },
        _ => equiv_structural_or_equals(a, b),
    }
}

fn equiv_structural_or_equals(a: &Value, b: &Value) -> bool {
    if let Some(coll) = a.as_collection() {
        coll.equiv(b)
    } else if let Some(coll) = b.as_collection() {
        coll.equiv(a)
    } else {
        equals(a, b)
    }
}

/// Equivalence strategy chosen once for a fixed left operand.
///
/// Scanning many right operands against one left operand (a hash bucket,
/// a `case` table) selects the strategy once with [`equiv_pred`] and then
/// calls [`EquivPred::equiv`] per pair without re-testing the left side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquivPred {
    /// Left operand is nil: only nil matches
    Null,
    /// Left operand is a number: only numbers of equal value match
    Number,
    /// Content equality, for strings, symbols and keywords
    Equals,
    /// Structural equivalence when either side is a collection. Also used
    /// for left operands that are neither text-like nor numeric, so a
    /// collection on the right still decides
    Collection,
}

impl EquivPred {
    /// Compare `left` (the operand this strategy was chosen for) with `right`.
    pub fn equiv(self, left: &Value, right: &Value) -> bool {
        match self {
            EquivPred::Null => right.is_nil(),
            EquivPred::Number => match (left.as_number(), right.as_number()) {
                (Some(x), Some(y)) => numbers::equal(x, y),
                _ => false,
            },
            EquivPred::Equals => equals(left, right),
            EquivPred::Collection => equiv_structural_or_equals(left, right),
        }
    }
}

/// Select the equivalence strategy for a left operand.
pub fn equiv_pred(left: &Value) -> EquivPred {
    match left.category() {
        Category::Null => EquivPred::Null,
        Category::Number => EquivPred::Number,
        Category::Sequential | Category::Collection => EquivPred::Collection,
        Category::Other => match left {
            Value::String(_) | Value::Symbol(_) | Value::Keyword(_) => EquivPred::Equals,
            _ => EquivPred::Collection,
        },
    }
}

/// Primitive fast path for two integers.
#[inline]
pub fn equiv_long(a: i64, b: i64) -> bool {
    a == b
}

/// Primitive fast path for two doubles (IEEE equality: `NaN != NaN`).
#[inline]
pub fn equiv_double(a: f64, b: f64) -> bool {
    a == b
}

/// Primitive fast path for two booleans.
#[inline]
pub fn equiv_bool(a: bool, b: bool) -> bool {
    a == b
}

/// Primitive fast path for two characters.
#[inline]
pub fn equiv_char(a: char, b: char) -> bool {
    a == b
}

/// Content equality, consistent with the host hash [`Value::hash_code`].
///
/// Values of different representations are never equal here, except that
/// lists and vectors with equal elements are. Floats compare by bit pattern,
/// with all NaNs equal to each other.
pub fn equals(a: &Value, b: &Value) -> bool {
    if identical(a, b) {
        return true;
    }
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        }
        (Value::Ratio(x), Value::Ratio(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::List(x, _) | Value::Vector(x, _), Value::List(y, _) | Value::Vector(y, _)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| equals(p, q))
        }
        // Keys are matched by content equality, not by the map's own
        // equivalence, so `{1 :a}` and `{1.0 :a}` stay apart. Both directions
        // are checked since distinct NaN keys are equal here.
        (Value::Map(x, _), Value::Map(y, _)) => {
            let entry_in = |k: &Value, v: &Value, m: &im::HashMap<Value, Value>| {
                m.iter().any(|(mk, mv)| equals(k, mk) && equals(v, mv))
            };
            x.len() == y.len()
                && x.iter().all(|(k, v)| entry_in(k, v, y))
                && y.iter().all(|(k, v)| entry_in(k, v, x))
        }
        (Value::Set(x, _), Value::Set(y, _)) => {
            x.len() == y.len()
                && x.iter().all(|item| y.iter().any(|other| equals(item, other)))
                && y.iter().all(|item| x.iter().any(|other| equals(item, other)))
        }
        (Value::Object(x), Value::Object(y)) => x.equals(y.as_ref()),
        _ => false,
    }
}

/// Natural three-way ordering, returning -1, 0 or 1.
///
/// Nil sorts before everything else. Numbers compare by mathematical value.
/// Otherwise the left operand's natural ordering decides; values without one
/// (lists, maps, sets, functions) and mismatched pairs fail with a type
/// error.
pub fn compare(a: &Value, b: &Value) -> Result<i32> {
    if identical(a, b) {
        return Ok(0);
    }
    match (a, b) {
        (Value::Nil, _) => Ok(-1),
        (_, Value::Nil) => Ok(1),
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(numbers::compare(x, y)),
            (Some(_), None) => Err(Error::type_error_in("compare", "number", b.type_name())),
            _ => natural_compare(a, b),
        },
    }
}

fn natural_compare(a: &Value, b: &Value) -> Result<i32> {
    let ordering = match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Char(x), Value::Char(y)) => x.cmp(y),
        // Host strings order by UTF-16 code unit
        (Value::String(x), Value::String(y)) => x.encode_utf16().cmp(y.encode_utf16()),
        (Value::Symbol(x), Value::Symbol(y)) => x.cmp(y),
        (Value::Keyword(x), Value::Keyword(y)) => x.cmp(y),
        (Value::Vector(x, _), Value::Vector(y, _)) => return collection::compare_vectors(x, y),
        (Value::Object(obj), _) => {
            return match obj.as_comparable() {
                Some(cmp) => cmp.compare_to(b),
                None => Err(Error::type_error_in("compare", "comparable", a.type_name())),
            };
        }
        (Value::List(..) | Value::Map(..) | Value::Set(..) | Value::Fn(_), _) => {
            return Err(Error::type_error_in("compare", "comparable", a.type_name()));
        }
        _ => return Err(Error::type_error_in("compare", a.type_name(), b.type_name())),
    };
    Ok(numbers::ordering_to_int(ordering))
}

/// Null-safe runtime type accessor: `None` for nil.
pub fn class_of(x: &Value) -> Option<TypeKey> {
    x.type_key()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Arity;
    use crate::symbol::Symbol;

    #[test]
    fn test_nil_equivalence() {
        assert!(equiv(&Value::Nil, &Value::Nil));
        assert!(!equiv(&Value::Nil, &Value::Bool(false)));
        assert!(!equiv(&Value::Bool(false), &Value::Nil));
    }

    #[test]
    fn test_numbers_across_representations() {
        assert!(equiv(&Value::int(3), &Value::float(3.0)));
        assert!(equiv(&Value::int(3), &Value::bigint(3)));
        assert!(equiv(&Value::ratio(1, 2).unwrap(), &Value::float(0.5)));
        assert!(!equiv(&Value::int(3), &Value::string("3")));
        assert!(!equiv(&Value::string("3"), &Value::int(3)));
    }

    #[test]
    fn test_identical_nan_is_equivalent() {
        let nan = Value::float(f64::NAN);
        assert!(equiv(&nan, &nan));
        assert!(!equiv(&nan, &Value::float(f64::NAN)));
    }

    #[test]
    fn test_equals_keeps_representations_apart() {
        assert!(!equals(&Value::int(3), &Value::float(3.0)));
        assert!(equals(&Value::float(f64::NAN), &Value::float(f64::NAN)));
        assert!(!equals(&Value::float(0.0), &Value::float(-0.0)));
        assert!(equals(&Value::string("abc"), &Value::string("abc")));
    }

    #[test]
    fn test_collections_compare_structurally() {
        let v = Value::vector(vec![Value::int(1), Value::float(2.0)]);
        let l = Value::list(vec![Value::int(1), Value::int(2)]);
        assert!(equiv(&v, &l));
        assert!(equiv(&l, &v));
        assert!(!equiv(&v, &Value::set(vec![Value::int(1), Value::int(2)])));
    }

    #[test]
    fn test_equiv_pred_selection() {
        assert_eq!(equiv_pred(&Value::Nil), EquivPred::Null);
        assert_eq!(equiv_pred(&Value::int(1)), EquivPred::Number);
        assert_eq!(equiv_pred(&Value::string("s")), EquivPred::Equals);
        assert_eq!(equiv_pred(&Value::symbol(Symbol::new("s"))), EquivPred::Equals);
        assert_eq!(equiv_pred(&Value::vector(vec![])), EquivPred::Collection);
        assert_eq!(equiv_pred(&Value::map(vec![])), EquivPred::Collection);
        assert_eq!(equiv_pred(&Value::keyword("k")), EquivPred::Equals);
        assert_eq!(equiv_pred(&Value::char('c')), EquivPred::Collection);
    }

    #[test]
    fn test_equiv_pred_matches_equiv() {
        let left = Value::int(2);
        let pred = equiv_pred(&left);
        for right in [Value::float(2.0), Value::string("2"), Value::Nil, Value::int(3)] {
            assert_eq!(pred.equiv(&left, &right), equiv(&left, &right));
        }
    }

    /// A host collection equivalent to one particular character.
    #[derive(Debug)]
    struct CharBag(char);

    impl Object for CharBag {
        fn type_name(&self) -> &'static str {
            "char-bag"
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_collection(&self) -> Option<&dyn crate::object::Collection> {
            Some(self)
        }
    }

    impl crate::object::Collection for CharBag {
        fn equiv(&self, other: &Value) -> bool {
            matches!(other, Value::Char(c) if *c == self.0)
        }

        fn hasheq(&self) -> i32 {
            self.0 as i32
        }

        fn count(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_equiv_pred_consults_collection_on_the_right() {
        let bag = Value::object(CharBag('x'));
        let left = Value::char('x');
        let pred = equiv_pred(&left);
        assert_eq!(pred, EquivPred::Collection);
        assert!(equiv(&left, &bag));
        assert_eq!(pred.equiv(&left, &bag), equiv(&left, &bag));

        let f = crate::function::make_native_fn("f", Arity::variadic(0), |_| Ok(Value::Nil));
        for other in [Value::Bool(true), Value::Fn(f)] {
            assert_eq!(equiv_pred(&other), EquivPred::Collection);
            assert_eq!(equiv_pred(&other).equiv(&other, &bag), equiv(&other, &bag));
        }
    }

    #[test]
    fn test_primitive_overloads() {
        assert!(equiv_long(5, 5));
        assert!(!equiv_double(f64::NAN, f64::NAN));
        assert!(equiv_double(0.0, -0.0));
        assert!(equiv_bool(true, true));
        assert!(!equiv_char('a', 'b'));
    }

    #[test]
    fn test_compare_nil_and_numbers() {
        assert_eq!(compare(&Value::Nil, &Value::Nil).unwrap(), 0);
        assert_eq!(compare(&Value::Nil, &Value::int(0)).unwrap(), -1);
        assert_eq!(compare(&Value::int(0), &Value::Nil).unwrap(), 1);
        assert_eq!(compare(&Value::int(1), &Value::float(1.5)).unwrap(), -1);
        assert!(compare(&Value::int(1), &Value::string("a")).is_err());
    }

    #[test]
    fn test_compare_natural_ordering() {
        assert_eq!(compare(&Value::string("a"), &Value::string("b")).unwrap(), -1);
        assert_eq!(compare(&Value::keyword("b"), &Value::keyword("a")).unwrap(), 1);
        assert_eq!(compare(&Value::Bool(false), &Value::Bool(true)).unwrap(), -1);
        assert_eq!(compare(&Value::char('z'), &Value::char('z')).unwrap(), 0);
    }

    #[test]
    fn test_compare_type_mismatch() {
        let err = compare(&Value::string("a"), &Value::keyword("a")).unwrap_err();
        assert_eq!(err.to_string(), "compare: expected string, got keyword");
        let m1 = Value::map(vec![(Value::keyword("a"), Value::int(1))]);
        let m2 = Value::map(vec![(Value::keyword("b"), Value::int(2))]);
        assert!(compare(&m1, &m2).is_err());
    }

    #[test]
    fn test_class_of() {
        assert_eq!(class_of(&Value::Nil), None);
        assert_eq!(class_of(&Value::int(1)), Some(TypeKey::Int));
        assert_eq!(class_of(&Value::string("s")), Some(TypeKey::String));
    }
}
