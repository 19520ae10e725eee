// klujur-runtime - Arity error integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;

use std::error::Error as _;

use common::*;
use klujur_runtime::{ArityError, ErrorKind, demunge, munge};

#[test]
fn test_message_shows_small_counts_exactly() {
    let err = ArityError::new(3, "f");
    assert_eq!(err.to_string(), "Wrong number of args (3) passed to: f");
    assert_eq!(err.actual(), 3);
}

#[test]
fn test_message_caps_large_counts() {
    assert_eq!(
        ArityError::new(25, "f").to_string(),
        "Wrong number of args (> 20) passed to: f"
    );
    assert_eq!(
        ArityError::new(20, "f").to_string(),
        "Wrong number of args (20) passed to: f"
    );
    assert_eq!(ArityError::new(21, "f").actual(), 21);
}

#[test]
fn test_name_is_demunged_for_display_only() {
    let raw = format!("user${}", munge("valid-input?"));
    let err = ArityError::new(1, raw.as_str());
    assert_eq!(err.name(), "user$valid_input_QMARK_");
    assert_eq!(
        err.to_string(),
        "Wrong number of args (1) passed to: user/valid-input?"
    );
    assert_eq!(demunge(err.name()), "user/valid-input?");
}

#[test]
fn test_cause_is_exposed_as_source() {
    let cause = Error::IllegalArgument("bad destructuring".into());
    let err = ArityError::with_cause(2, "f", cause);
    assert!(err.cause().is_some());
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("bad destructuring"));
    assert!(ArityError::new(2, "f").source().is_none());
}

#[test]
fn test_arity_errors_are_invalid_arguments() {
    let err: Error = ArityError::new(0, "f").into();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.as_arity().is_some());
    // The wrapper is transparent
    assert_eq!(err.to_string(), "Wrong number of args (0) passed to: f");
}

#[test]
fn test_native_functions_raise_arity_errors() {
    let f = sum_fn();
    assert!(f.invoke(&vec![Value::int(1); 21]).is_ok());

    let err = f.invoke(&vec![Value::int(1); 4]).unwrap_err();
    let arity = err.as_arity().expect("arity error");
    assert_eq!(arity.actual(), 4);
    assert_eq!(arity.name(), "sum_ints");

    let strict = make_native_fn("strict", Arity::fixed(&[1]), |args| Ok(args[0].clone()));
    let err = strict.invoke(&vec![Value::Nil; 25]).unwrap_err();
    assert_eq!(err.to_string(), "Wrong number of args (> 20) passed to: strict");
}
