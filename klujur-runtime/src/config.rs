// klujur-runtime - Runtime settings
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Runtime settings for the value core.
//!
//! Settings follow the same shape throughout: a getter, and a setter that
//! returns the previous value so callers can restore it.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Argument counts above this are reported as "> 20" in arity errors.
pub const ARITY_DISPLAY_LIMIT: usize = 20;

// Thread-local print settings (can be configured by runtime)
thread_local! {
    /// Maximum number of elements to print in a collection.
    /// None means unlimited, Some(n) means print at most n elements.
    static PRINT_LENGTH: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Whether keyword interning sweeps dead table entries before each lookup.
static SWEEP_ON_INTERN: AtomicBool = AtomicBool::new(true);

/// Get the current print-length setting.
pub fn get_print_length() -> Option<usize> {
    PRINT_LENGTH.with(|pl| pl.get())
}

/// Set the print-length setting. Returns the previous value.
pub fn set_print_length(len: Option<usize>) -> Option<usize> {
    PRINT_LENGTH.with(|pl| pl.replace(len))
}

/// Whether interning runs the opportunistic cache sweep.
pub fn sweep_on_intern() -> bool {
    SWEEP_ON_INTERN.load(Ordering::Relaxed)
}

/// Enable or disable the interning sweep. Returns the previous value.
///
/// While it is off, dropped keywords still post clearance notices;
/// call [`crate::Keyword::sweep`] to drain them and remove dead entries.
pub fn set_sweep_on_intern(enabled: bool) -> bool {
    SWEEP_ON_INTERN.swap(enabled, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_length_round_trip() {
        assert_eq!(get_print_length(), None);
        assert_eq!(set_print_length(Some(3)), None);
        assert_eq!(get_print_length(), Some(3));
        assert_eq!(set_print_length(None), Some(3));
    }
}
