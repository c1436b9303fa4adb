//! Error types for the safemap library.
//!
//! Ordinary map operations never fail: a missing key is reported through
//! `Option` or `bool`. The only error type is [`InvariantError`], returned by
//! the `check_invariants` methods when the storage and the insertion-order
//! record disagree.
//!
//! ## Example Usage
//!
//! ```
//! use safemap::error::InvariantError;
//! use safemap::map::SafeMap;
//!
//! let map: SafeMap<u32, &str> = SafeMap::new_ordered();
//! map.store(1, "a");
//! let checked: Result<(), InvariantError> = map.check_invariants();
//! assert!(checked.is_ok());
//! ```

use std::fmt;

/// Error returned when internal map invariants are violated.
///
/// Produced by [`MapCore::check_invariants`](crate::map::MapCore::check_invariants)
/// and [`SafeMap::check_invariants`](crate::map::SafeMap::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
