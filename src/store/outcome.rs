//! Outcome Module
//!
//! Result types that keep storage trouble visible without turning it into
//! errors.

use crate::codec::Value;
use crate::error::StorageError;

// == Lookup ==
/// Result of `RecentStore::get`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    NotFound,
    /// Provider faulted; treat as not found
    Degraded(StorageError),
}

impl Lookup {
    /// The value, with `NotFound` and `Degraded` collapsed to `None`.
    pub fn value(self) -> Option<Value> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

// == Write ==
/// Result of `RecentStore::set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Written on the first try
    Stored,
    /// Written after eviction made room
    StoredAfterEviction { attempts: usize, evicted: usize },
    /// Given up on; the value is not in the store
    Dropped(StorageError),
}

impl Write {
    pub fn is_stored(&self) -> bool {
        !matches!(self, Write::Dropped(_))
    }
}

// == Outcome ==
/// Result of a store operation that degrades to a fallback value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Done(T),
    Degraded { fallback: T, cause: StorageError },
}

impl<T> Outcome<T> {
    pub(crate) fn degraded(fallback: T, cause: StorageError) -> Self {
        Outcome::Degraded { fallback, cause }
    }

    /// The value, or the fallback if degraded.
    pub fn into_value(self) -> T {
        match self {
            Outcome::Done(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Done(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn cause(&self) -> Option<&StorageError> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }
}

impl<T: Default> From<Result<T, StorageError>> for Outcome<T> {
    fn from(result: Result<T, StorageError>) -> Self {
        match result {
            Ok(value) => Outcome::Done(value),
            Err(cause) => Outcome::degraded(T::default(), cause),
        }
    }
}
