// klujur-runtime - Symbol type
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are identifiers that may be optionally namespaced.
//!
//! Symbols compare by content. Keywords, which are interned, wrap a symbol
//! (see [`crate::keyword`]).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::hash::{hash_combine, string_hash};
use crate::murmur3;

/// A symbol with optional namespace.
#[derive(Clone)]
pub struct Symbol {
    namespace: Option<Arc<str>>,
    name: Arc<str>,
}

impl Symbol {
    /// Create a new symbol with no namespace.
    pub fn new(name: &str) -> Self {
        Symbol {
            namespace: None,
            name: Arc::from(name),
        }
    }

    /// Create a new symbol with a namespace.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        Symbol {
            namespace: Some(Arc::from(namespace)),
            name: Arc::from(name),
        }
    }

    /// Parse a symbol from a string like "foo" or "ns/foo".
    pub fn parse(s: &str) -> Self {
        if let Some(slash_pos) = s.find('/') {
            // Handle special case of "/" symbol
            if s == "/" {
                return Symbol::new("/");
            }
            let ns = &s[..slash_pos];
            let name = &s[slash_pos + 1..];
            Symbol::with_namespace(ns, name)
        } else {
            Symbol::new(s)
        }
    }

    /// Get the namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host hash: the name's string hash combined with the namespace's.
    pub fn hash_code(&self) -> i32 {
        hash_combine(
            string_hash(&self.name),
            self.namespace.as_deref().map_or(0, string_hash),
        )
    }

    /// Value hash: the name's Murmur3 hash combined with the namespace's
    /// string hash.
    pub fn hasheq(&self) -> i32 {
        hash_combine(
            murmur3::hash_unencoded_chars(&self.name),
            self.namespace.as_deref().map_or(0, string_hash),
        )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.namespace {
            write!(f, "{}/{}", ns, self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// Names order by UTF-16 code unit, like strings
fn cmp_utf16(a: &str, b: &str) -> std::cmp::Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (&self.namespace, &other.namespace) {
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, None) => cmp_utf16(&self.name, &other.name),
            (Some(a), Some(b)) => match cmp_utf16(a, b) {
                std::cmp::Ordering::Equal => cmp_utf16(&self.name, &other.name),
                other => other,
            },
        }
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hasheq());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_symbol() {
        let sym = Symbol::new("foo");
        assert_eq!(sym.name(), "foo");
        assert!(sym.namespace().is_none());
        assert_eq!(format!("{}", sym), "foo");
    }

    #[test]
    fn test_namespaced_symbol() {
        let sym = Symbol::with_namespace("user", "foo");
        assert_eq!(sym.name(), "foo");
        assert_eq!(sym.namespace(), Some("user"));
        assert_eq!(format!("{}", sym), "user/foo");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Symbol::parse("user/foo"), Symbol::with_namespace("user", "foo"));
        assert_eq!(Symbol::parse("foo"), Symbol::new("foo"));
        assert_eq!(Symbol::parse("/").name(), "/");
    }

    #[test]
    fn test_equality_is_by_content() {
        assert_eq!(Symbol::new("foo"), Symbol::new("foo"));
        assert_ne!(Symbol::new("foo"), Symbol::with_namespace("user", "foo"));
        assert_eq!(Symbol::new("foo").hasheq(), Symbol::new("foo").hasheq());
    }

    #[test]
    fn test_ordering() {
        let a = Symbol::new("a");
        let b = Symbol::new("b");
        let ns_a = Symbol::with_namespace("ns", "a");

        assert!(a < b);
        assert!(a < ns_a); // Non-namespaced comes before namespaced
    }

    #[test]
    fn test_ordering_uses_utf16_code_units() {
        // U+10000 encodes as a surrogate pair (0xD800 ...), below U+FFFF
        let astral = Symbol::new("\u{10000}");
        let bmp = Symbol::new("\u{FFFF}");
        assert!(astral < bmp);
        assert!(Symbol::with_namespace("\u{10000}", "z") < Symbol::with_namespace("\u{FFFF}", "a"));
    }
}
