//! # Collection Client
//!
//! The typed handle used to send requests to a [`CollectionActor`](crate::CollectionActor).

use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for a document collection.
///
/// Holds only the sender half of the request channel, so it is cheap to clone and can be
/// shared across tasks. Every method sends one request and awaits its reply.
pub struct CollectionClient<T: Document> {
    sender: mpsc::Sender<CollectionRequest<T>>,
}

impl<T: Document> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Document> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<T>>) -> Self {
        Self { sender }
    }

    /// Point read. `Ok(None)` when the key is absent.
    pub async fn get(&self, key: impl Into<String>) -> Result<Option<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CollectionRequest::Get {
            key: key.into(),
            respond_to,
        })
        .await?;
        response.await.map_err(|_| StoreError::ServiceDropped)?
    }

    /// Full-replace write.
    pub async fn set(&self, key: impl Into<String>, document: T) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CollectionRequest::Set {
            key: key.into(),
            document,
            respond_to,
        })
        .await?;
        response.await.map_err(|_| StoreError::ServiceDropped)?
    }

    /// Point delete. Deleting an absent key succeeds.
    pub async fn delete(&self, key: impl Into<String>) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CollectionRequest::Delete {
            key: key.into(),
            respond_to,
        })
        .await?;
        response.await.map_err(|_| StoreError::ServiceDropped)?
    }

    /// Every `(key, document)` pair in the collection.
    pub async fn scan(&self) -> Result<Vec<(String, T)>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CollectionRequest::Scan { respond_to }).await?;
        response.await.map_err(|_| StoreError::ServiceDropped)?
    }

    /// Atomically applies `mutation` to the document at `key`.
    ///
    /// Returns the document as stored afterwards (`None` if absent or deleted).
    pub async fn apply(
        &self,
        key: impl Into<String>,
        mutation: T::Mutation,
    ) -> Result<Option<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.send(CollectionRequest::Apply {
            key: key.into(),
            mutation,
            respond_to,
        })
        .await?;
        response.await.map_err(|_| StoreError::ServiceDropped)?
    }

    async fn send(&self, request: CollectionRequest<T>) -> Result<(), StoreError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| StoreError::ServiceClosed)
    }
}
