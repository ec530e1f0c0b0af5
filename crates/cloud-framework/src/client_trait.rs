//! # CollectionAccess Trait
//!
//! Provides a common interface for domain-specific wrappers around a [`CollectionClient`],
//! adding default read methods that map [`StoreError`] into the wrapper's own error type.

use crate::{CollectionClient, Document, StoreError};
use async_trait::async_trait;

/// Trait for domain clients that front a single collection.
///
/// Implementors supply the inner client and an error mapping; `get` and `scan` come for
/// free. Writes are left to the implementor so it can enforce its own rules first.
///
/// # Example
///
/// ```rust,ignore
/// struct TallyBook { inner: CollectionClient<Tally> }
///
/// #[async_trait]
/// impl CollectionAccess<Tally> for TallyBook {
///     type Error = TallyError;
///     fn inner(&self) -> &CollectionClient<Tally> { &self.inner }
///     fn map_error(e: StoreError) -> TallyError { TallyError::Store(e) }
/// }
///
/// let all = book.scan().await?;
/// ```
#[async_trait]
pub trait CollectionAccess<T: Document>: Send + Sync {
    /// The domain error type.
    type Error: Send + Sync;

    /// Access the inner collection client.
    fn inner(&self) -> &CollectionClient<T>;

    /// Map store errors to the domain error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch one document by key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: String) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(key).await.map_err(Self::map_error)
    }

    /// Fetch every document in the collection.
    #[tracing::instrument(skip(self))]
    async fn scan(&self) -> Result<Vec<(String, T)>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().scan().await.map_err(Self::map_error)
    }
}
