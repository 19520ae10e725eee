// klujur-runtime - Functions as comparators
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Comparator utilities for sorting and searching with function values.
//!
//! Any two-argument function can serve as a comparator. Its result is
//! checked once by [`CompareResult::interpret`]:
//! - a boolean is a "less than" predicate: `true` means -1; `false` calls
//!   the function again with the arguments swapped, and a truthy result
//!   there means 1, otherwise 0
//! - a number is the three-way result itself, narrowed to a 32-bit int
//!
//! Anything else is a type error.

use std::cmp::Ordering;

use super::Function;
use crate::error::{Error, Result};
use crate::numbers;
use crate::value::Value;

/// A two-argument invocation result, as a comparator reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareResult {
    /// A "less than" predicate answer
    Less(bool),
    /// A three-way comparison result
    ThreeWay(i32),
}

impl CompareResult {
    /// Classify an invocation result: boolean first, then numeric.
    pub fn interpret(result: &Value) -> Result<CompareResult> {
        match result {
            Value::Bool(b) => Ok(CompareResult::Less(*b)),
            other => match other.as_number() {
                Some(n) => Ok(CompareResult::ThreeWay(numbers::int_value(n))),
                None => Err(Error::type_error_in(
                    "Comparator",
                    "boolean or number",
                    other.type_name(),
                )),
            },
        }
    }
}

/// Compare `a` and `b` with a function.
pub fn compare_with(f: &Function, a: &Value, b: &Value) -> Result<i32> {
    let result = f.invoke(&[a.clone(), b.clone()])?;
    match CompareResult::interpret(&result)? {
        CompareResult::Less(true) => Ok(-1),
        CompareResult::Less(false) => {
            // Either a > b or a = b: ask the other way round
            let reverse = f.invoke(&[b.clone(), a.clone()])?;
            Ok(if reverse.is_truthy() { 1 } else { 0 })
        }
        CompareResult::ThreeWay(n) => Ok(n),
    }
}

/// Comparator from a "less than" predicate. Results are read by
/// truthiness, so the predicate may return any value.
pub fn predicate_comparator(less: Function) -> impl Fn(&Value, &Value) -> Result<i32> {
    move |a: &Value, b: &Value| {
        if less.invoke(&[a.clone(), b.clone()])?.is_truthy() {
            Ok(-1)
        } else if less.invoke(&[b.clone(), a.clone()])?.is_truthy() {
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

/// Comparator from a function returning a three-way number.
pub fn three_way_comparator(compare: Function) -> impl Fn(&Value, &Value) -> Result<i32> {
    move |a: &Value, b: &Value| {
        let result = compare.invoke(&[a.clone(), b.clone()])?;
        match result.as_number() {
            Some(n) => Ok(numbers::int_value(n)),
            None => Err(Error::type_error_in(
                "Comparator",
                "number",
                result.type_name(),
            )),
        }
    }
}

/// Stable sort with a function comparator.
///
/// The first comparator failure aborts the sort and is returned.
pub fn sort_by_fn(items: Vec<Value>, comparator: &Function) -> Result<Vec<Value>> {
    merge_sort(items, &|a: &Value, b: &Value| compare_with(comparator, a, b))
}

fn merge_sort(
    mut items: Vec<Value>,
    cmp: &dyn Fn(&Value, &Value) -> Result<i32>,
) -> Result<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp)?;
    let right = merge_sort(right, cmp)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Ties take from the left run to keep the sort stable
        if cmp(l, r)? <= 0 {
            merged.extend(left.next());
        } else {
            merged.extend(right.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

/// Binary search for a key in sorted elements using a function comparator.
///
/// Returns Ok(index) if found, Err(index) if not found where index is the
/// insertion point.
pub fn binary_search_by_fn(
    elements: &[Value],
    key: &Value,
    comparator: &Function,
) -> Result<std::result::Result<usize, usize>> {
    let mut low: usize = 0;
    let mut high: usize = elements.len();

    while low < high {
        let mid = low + (high - low) / 2;
        match compare_with(comparator, key, &elements[mid])?.cmp(&0) {
            Ordering::Less => high = mid,
            Ordering::Greater => low = mid + 1,
            Ordering::Equal => return Ok(Ok(mid)),
        }
    }

    Ok(Err(low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equiv::compare;
    use crate::function::{Arity, make_native_fn};

    fn less_than() -> Function {
        make_native_fn("<", Arity::fixed(&[2]), |args| {
            Ok(Value::Bool(compare(&args[0], &args[1])? < 0))
        })
    }

    fn three_way() -> Function {
        make_native_fn("compare", Arity::fixed(&[2]), |args| {
            Ok(Value::int(compare(&args[0], &args[1])? as i64 * 10))
        })
    }

    #[test]
    fn test_predicate_results() {
        let f = less_than();
        assert_eq!(compare_with(&f, &Value::int(1), &Value::int(2)).unwrap(), -1);
        assert_eq!(compare_with(&f, &Value::int(2), &Value::int(1)).unwrap(), 1);
        assert_eq!(compare_with(&f, &Value::int(2), &Value::int(2)).unwrap(), 0);
    }

    #[test]
    fn test_numeric_result_is_used_directly() {
        let f = three_way();
        assert_eq!(compare_with(&f, &Value::int(1), &Value::int(2)).unwrap(), -10);
        assert_eq!(compare_with(&f, &Value::int(3), &Value::int(2)).unwrap(), 10);
    }

    #[test]
    fn test_float_result_is_narrowed() {
        let f = make_native_fn("half", Arity::fixed(&[2]), |_| Ok(Value::float(-2.7)));
        assert_eq!(compare_with(&f, &Value::Nil, &Value::Nil).unwrap(), -2);
    }

    #[test]
    fn test_other_results_are_type_errors() {
        let f = make_native_fn("bad", Arity::fixed(&[2]), |_| Ok(Value::string("x")));
        let err = compare_with(&f, &Value::int(1), &Value::int(2)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Comparator: expected boolean or number, got string"
        );
    }

    #[test]
    fn test_explicit_adapters() {
        let by_pred = predicate_comparator(less_than());
        assert_eq!(by_pred(&Value::int(5), &Value::int(1)).unwrap(), 1);
        let by_num = three_way_comparator(three_way());
        assert_eq!(by_num(&Value::int(1), &Value::int(5)).unwrap(), -10);
        assert!(three_way_comparator(less_than())(&Value::int(1), &Value::int(5)).is_err());
    }

    #[test]
    fn test_sort_is_stable() {
        // Compare only the first element of each pair
        let by_first = make_native_fn("by-first", Arity::fixed(&[2]), |args| {
            let key = |v: &Value| match v {
                Value::Vector(items, _) => items.front().cloned().unwrap_or(Value::Nil),
                other => other.clone(),
            };
            Ok(Value::Bool(compare(&key(&args[0]), &key(&args[1]))? < 0))
        });
        let pair = |k: i64, tag: &str| Value::vector(vec![Value::int(k), Value::keyword(tag)]);
        let items = vec![pair(2, "a"), pair(1, "b"), pair(2, "c"), pair(1, "d")];
        let sorted = sort_by_fn(items, &by_first).unwrap();
        assert_eq!(
            sorted,
            vec![pair(1, "b"), pair(1, "d"), pair(2, "a"), pair(2, "c")]
        );
    }

    #[test]
    fn test_sort_surfaces_first_error() {
        let items = vec![Value::int(1), Value::string("a"), Value::int(0)];
        assert!(sort_by_fn(items, &less_than()).is_err());
    }

    #[test]
    fn test_binary_search() {
        let elements = vec![Value::int(1), Value::int(3), Value::int(5)];
        let f = less_than();
        assert_eq!(binary_search_by_fn(&elements, &Value::int(3), &f).unwrap(), Ok(1));
        assert_eq!(binary_search_by_fn(&elements, &Value::int(4), &f).unwrap(), Err(2));
        assert_eq!(binary_search_by_fn(&[], &Value::int(4), &f).unwrap(), Err(0));
    }
}
