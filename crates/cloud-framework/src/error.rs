//! # Store Errors
//!
//! Errors returned by [`CollectionClient`](crate::CollectionClient) calls. Channel failures,
//! key validation and rejected mutations all surface through the same enum so callers
//! have one type to map into their own domain error.

/// Errors that can occur while talking to a document collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store service closed")]
    ServiceClosed,
    #[error("Store service dropped response channel")]
    ServiceDropped,
    #[error("Invalid document key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },
    #[error("Mutation rejected: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a document-level error raised while applying a mutation.
    pub fn rejected(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Rejected(Box::new(e))
    }
}
