// klujur-runtime - Error types for the value core
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for equivalence, ordering and invocation.

use std::sync::Arc;

use thiserror::Error;

use crate::config::ARITY_DISPLAY_LIMIT;
use crate::demunge::demunge;
use crate::value::Value;

/// Result type for the value core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by comparison, invocation and argument validation.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Wrong number of arguments to a function
    #[error(transparent)]
    Arity(#[from] ArityError),
    /// Invalid argument value
    #[error("{0}")]
    IllegalArgument(String),
    /// An operand lacks the capability an operation needs
    #[error("{}", type_mismatch_message(.expected, .got, .context.as_deref()))]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
    },
    /// A value raised by a callable
    #[error("{0}")]
    Thrown(Value),
    /// An arbitrary underlying failure carried through unchanged
    #[error(transparent)]
    Propagated(Arc<dyn std::error::Error + Send + Sync>),
    /// Internal error - invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification, so generic argument validation can catch
/// arity failures together with other bad arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    TypeMismatch,
    Thrown,
    Propagated,
    Internal,
}

fn type_mismatch_message(expected: &str, got: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!("{}: expected {}, got {}", ctx, expected, got),
        None => format!("Type error: expected {}, got {}", expected, got),
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Arity(_) | Error::IllegalArgument(_) => ErrorKind::InvalidArgument,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::Thrown(_) => ErrorKind::Thrown,
            Error::Propagated(_) => ErrorKind::Propagated,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::TypeMismatch {
            expected,
            got,
            context: None,
        }
    }

    /// Create a type error with context.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::TypeMismatch {
            expected,
            got,
            context: Some(context.into()),
        }
    }

    /// Carry an arbitrary error through a call boundary.
    ///
    /// The original error keeps its identity: `Display` and `source()` are
    /// the original's, and it can be recovered with [`Error::propagated`].
    pub fn propagate<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Propagated(Arc::new(err))
    }

    /// The propagated error, if this is one.
    pub fn propagated(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Propagated(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// The arity error, if this is one.
    pub fn as_arity(&self) -> Option<&ArityError> {
        match self {
            Error::Arity(err) => Some(err),
            _ => None,
        }
    }
}

/// Invocation with an argument count that matches no supported arity.
#[derive(Debug, Clone, Error)]
#[error(
    "Wrong number of args ({}) passed to: {}",
    display_count(.actual),
    demunge(.name)
)]
pub struct ArityError {
    actual: usize,
    name: String,
    #[source]
    cause: Option<Box<Error>>,
}

fn display_count(actual: &usize) -> String {
    if *actual <= ARITY_DISPLAY_LIMIT {
        actual.to_string()
    } else {
        format!("> {}", ARITY_DISPLAY_LIMIT)
    }
}

impl ArityError {
    /// Create an arity error for a function's raw (munged) name.
    pub fn new(actual: usize, name: impl Into<String>) -> Self {
        ArityError {
            actual,
            name: name.into(),
            cause: None,
        }
    }

    /// Create an arity error caused by another failure.
    pub fn with_cause(actual: usize, name: impl Into<String>, cause: Error) -> Self {
        ArityError {
            actual,
            name: name.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// The attempted argument count.
    pub fn actual(&self) -> usize {
        self.actual
    }

    /// The raw function name, as given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying cause, if any.
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }
}
