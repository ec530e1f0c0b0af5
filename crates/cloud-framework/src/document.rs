//! # Document Trait
//!
//! The `Document` trait is the contract a record body must satisfy to live in a
//! [`CollectionActor`](crate::CollectionActor). Documents are keyed by a string and replaced
//! wholesale on `set`; the only partial-update path is [`Document::apply`], which the actor
//! runs inside its message loop so the read and the write happen in one turn.
//!
//! # Associated Types
//! - `Mutation` describes a single-key change (e.g. "increment the counter").
//! - `Error` is what `apply` returns when the mutation makes no sense for the current state.

use crate::error::StoreError;
use std::fmt::Debug;

/// Longest key accepted by the collection, in bytes.
pub const MAX_KEY_BYTES: usize = 1500;

/// Outcome of applying a mutation to the current state of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Write<T> {
    /// Replace (or create) the document with this body.
    Put(T),
    /// Remove the document.
    Delete,
    /// Leave the collection untouched.
    Keep,
}

/// Trait that any record body must implement to be stored in a collection.
pub trait Document: Clone + Debug + Send + Sync + 'static {
    /// A single-key change the collection can apply atomically.
    type Mutation: Send + Sync + Debug;

    /// Error raised when a mutation cannot be applied.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decide what to write given the current body (`None` if the key is absent).
    ///
    /// This is a pure function; the caller performs the resulting [`Write`].
    fn apply(
        key: &str,
        current: Option<&Self>,
        mutation: Self::Mutation,
    ) -> Result<Write<Self>, Self::Error>;
}

/// Checks that `key` can address a document.
///
/// Keys must be non-empty, must not be `.` or `..`, must not contain `/` and must fit
/// in [`MAX_KEY_BYTES`].
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key == "." || key == ".." {
        "key is a path segment"
    } else if key.contains('/') {
        "key contains '/'"
    } else if key.len() > MAX_KEY_BYTES {
        "key is too long"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}
