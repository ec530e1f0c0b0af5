//! # Collection Actor
//!
//! `CollectionActor` is the server side of a keyed document collection. It owns every
//! document of one collection and processes requests sequentially, so two requests never
//! observe each other half-done. Scans return documents in key order.

use crate::client::CollectionClient;
use crate::document::{validate_key, Document, Write};
use crate::error::StoreError;
use crate::message::CollectionRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns the documents of a single collection.
///
/// # Concurrency Model
/// One Tokio task runs [`CollectionActor::run`]; every request is handled to completion
/// before the next one is read from the channel. `Apply` therefore behaves as an atomic
/// read-modify-write, while a client-side `get` followed by `set` does not.
///
/// # Usage Pattern
///
/// ```rust,ignore
/// let (actor, client) = CollectionActor::<Counter>::new("counters", 16);
/// tokio::spawn(actor.run());
/// client.set("hits", Counter(1)).await?;
/// ```
pub struct CollectionActor<T: Document> {
    name: String,
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    documents: BTreeMap<String, T>,
}

impl<T: Document> CollectionActor<T> {
    /// Creates a new collection actor and its client.
    ///
    /// # Arguments
    ///
    /// * `name` - Collection name, used as a structured field in every log line.
    /// * `buffer_size` - Capacity of the request channel. A full channel makes callers wait.
    ///
    /// # Panics
    ///
    /// Panics if `buffer_size` is zero.
    pub fn new(name: impl Into<String>, buffer_size: usize) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name: name.into(),
            receiver,
            documents: BTreeMap::new(),
        };
        (actor, CollectionClient::new(sender))
    }

    /// Runs the request loop until every client has been dropped.
    pub async fn run(mut self) {
        let collection = self.name.clone();
        info!(%collection, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Get { key, respond_to } => {
                    let result = validate_key(&key).map(|()| self.documents.get(&key).cloned());
                    if let Ok(found) = &result {
                        debug!(%collection, %key, found = found.is_some(), "Get");
                    }
                    let _ = respond_to.send(result);
                }
                CollectionRequest::Set {
                    key,
                    document,
                    respond_to,
                } => {
                    debug!(%collection, %key, ?document, "Set");
                    let result = validate_key(&key).map(|()| {
                        self.documents.insert(key.clone(), document);
                        info!(%collection, %key, size = self.documents.len(), "Stored");
                    });
                    let _ = respond_to.send(result);
                }
                CollectionRequest::Delete { key, respond_to } => {
                    let result = validate_key(&key).map(|()| {
                        let existed = self.documents.remove(&key).is_some();
                        info!(%collection, %key, existed, size = self.documents.len(), "Deleted");
                    });
                    let _ = respond_to.send(result);
                }
                CollectionRequest::Scan { respond_to } => {
                    let snapshot: Vec<(String, T)> = self
                        .documents
                        .iter()
                        .map(|(key, doc)| (key.clone(), doc.clone()))
                        .collect();
                    debug!(%collection, count = snapshot.len(), "Scan");
                    let _ = respond_to.send(Ok(snapshot));
                }
                CollectionRequest::Apply {
                    key,
                    mutation,
                    respond_to,
                } => {
                    debug!(%collection, %key, ?mutation, "Apply");
                    let result = self.apply(&key, mutation);
                    if let Err(e) = &result {
                        warn!(%collection, %key, error = %e, "Apply failed");
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(%collection, size = self.documents.len(), "Shutdown");
    }

    fn apply(&mut self, key: &str, mutation: T::Mutation) -> Result<Option<T>, StoreError> {
        validate_key(key)?;
        let write =
            T::apply(key, self.documents.get(key), mutation).map_err(StoreError::rejected)?;
        match write {
            Write::Put(document) => {
                self.documents.insert(key.to_string(), document.clone());
                info!(collection = %self.name, %key, size = self.documents.len(), "Applied");
                Ok(Some(document))
            }
            Write::Delete => {
                self.documents.remove(key);
                info!(collection = %self.name, %key, size = self.documents.len(), "Applied delete");
                Ok(None)
            }
            Write::Keep => Ok(self.documents.get(key).cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Tally(u32);

    #[derive(Debug)]
    enum TallyChange {
        Bump,
        Drop,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("tally overflow")]
    struct TallyOverflow;

    impl Document for Tally {
        type Mutation = TallyChange;
        type Error = TallyOverflow;

        fn apply(
            _key: &str,
            current: Option<&Self>,
            mutation: TallyChange,
        ) -> Result<Write<Self>, TallyOverflow> {
            match (mutation, current) {
                (TallyChange::Bump, None) => Ok(Write::Put(Tally(1))),
                (TallyChange::Bump, Some(t)) => {
                    t.0.checked_add(1).map(|n| Write::Put(Tally(n))).ok_or(TallyOverflow)
                }
                (TallyChange::Drop, None) => Ok(Write::Keep),
                (TallyChange::Drop, Some(t)) if t.0 <= 1 => Ok(Write::Delete),
                (TallyChange::Drop, Some(t)) => Ok(Write::Put(Tally(t.0 - 1))),
            }
        }
    }

    fn spawn() -> CollectionClient<Tally> {
        let (actor, client) = CollectionActor::new("tallies", 8);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn set_replaces_and_scan_is_key_ordered() {
        let client = spawn();
        client.set("b", Tally(2)).await.unwrap();
        client.set("a", Tally(1)).await.unwrap();
        client.set("b", Tally(5)).await.unwrap();

        let all = client.scan().await.unwrap();
        assert_eq!(
            all,
            vec![("a".to_string(), Tally(1)), ("b".to_string(), Tally(5))]
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let client = spawn();
        client.set("a", Tally(1)).await.unwrap();
        client.delete("a").await.unwrap();
        client.delete("a").await.unwrap();
        assert_eq!(client.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn apply_runs_document_rules() {
        let client = spawn();
        assert_eq!(client.apply("a", TallyChange::Bump).await.unwrap(), Some(Tally(1)));
        assert_eq!(client.apply("a", TallyChange::Bump).await.unwrap(), Some(Tally(2)));
        assert_eq!(client.apply("a", TallyChange::Drop).await.unwrap(), Some(Tally(1)));
        assert_eq!(client.apply("a", TallyChange::Drop).await.unwrap(), None);
        assert_eq!(client.apply("a", TallyChange::Drop).await.unwrap(), None);
        assert!(client.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_mutation_leaves_document_alone() {
        let client = spawn();
        client.set("a", Tally(u32::MAX)).await.unwrap();
        let err = client.apply("a", TallyChange::Bump).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert_eq!(client.get("a").await.unwrap(), Some(Tally(u32::MAX)));
    }

    #[tokio::test]
    async fn invalid_keys_are_refused() {
        let client = spawn();
        assert!(matches!(
            client.set("a/b", Tally(1)).await,
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(client.get("").await, Err(StoreError::InvalidKey { .. })));
        assert!(client.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_applies_are_serialized() {
        let client = spawn();
        let mut handles = Vec::new();
        for _ in 0..50 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                client.apply("hits", TallyChange::Bump).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(client.get("hits").await.unwrap(), Some(Tally(50)));
    }
}
