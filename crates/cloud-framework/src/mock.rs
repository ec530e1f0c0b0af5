//! # Mock Collections
//!
//! Utilities for testing code that talks to a [`CollectionClient`] without running a
//! [`CollectionActor`](crate::CollectionActor).
//!
//! | Tool | Use |
//! |------|-----|
//! | [`MockCollection`] | Queue scripted replies up front, run the code, then [`MockCollection::verify`]. |
//! | [`create_mock_client`] + `expect_*` | Receive each request yourself, assert on it, answer it by hand. |
//!
//! The scripted mock answers requests strictly in order and checks the request kind and
//! key against the queued expectation. A mismatch panics inside the mock task; the caller
//! then sees [`StoreError::ServiceDropped`] and `verify` reports the leftover expectations.
//!
//! ```rust,ignore
//! let mut mock = MockCollection::<Tally>::new();
//! mock.expect_get("hits").return_ok(Some(Tally(3)));
//! mock.expect_set("hits").return_ok(());
//!
//! bump_by_hand(mock.client()).await?;
//! mock.verify();
//! ```

use crate::client::CollectionClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A queued request and the reply to send for it.
enum Expectation<T: Document> {
    Get {
        key: String,
        response: Result<Option<T>, StoreError>,
    },
    Set {
        key: String,
        response: Result<(), StoreError>,
    },
    Delete {
        key: String,
        response: Result<(), StoreError>,
    },
    Scan {
        response: Result<Vec<(String, T)>, StoreError>,
    },
    Apply {
        key: String,
        response: Result<Option<T>, StoreError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A collection client backed by scripted replies.
pub struct MockCollection<T: Document> {
    client: CollectionClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Document> Default for MockCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> MockCollection<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CollectionRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        CollectionRequest::Get { key, respond_to },
                        Some(Expectation::Get { key: want, response }),
                    ) => {
                        assert_eq!(key, want, "get issued for unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Set {
                            key, respond_to, ..
                        },
                        Some(Expectation::Set { key: want, response }),
                    ) => {
                        assert_eq!(key, want, "set issued for unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Delete { key, respond_to },
                        Some(Expectation::Delete { key: want, response }),
                    ) => {
                        assert_eq!(key, want, "delete issued for unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (CollectionRequest::Scan { respond_to }, Some(Expectation::Scan { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Apply {
                            key, respond_to, ..
                        },
                        Some(Expectation::Apply { key: want, response }),
                    ) => {
                        assert_eq!(key, want, "apply issued for unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> CollectionClient<T> {
        self.client.clone()
    }

    /// Expects a `get` for `key`.
    pub fn expect_get(&mut self, key: impl Into<String>) -> ExpectationBuilder<T, Option<T>> {
        let key = key.into();
        self.builder(move |response| Expectation::Get { key, response })
    }

    /// Expects a `set` for `key`.
    pub fn expect_set(&mut self, key: impl Into<String>) -> ExpectationBuilder<T, ()> {
        let key = key.into();
        self.builder(move |response| Expectation::Set { key, response })
    }

    /// Expects a `delete` for `key`.
    pub fn expect_delete(&mut self, key: impl Into<String>) -> ExpectationBuilder<T, ()> {
        let key = key.into();
        self.builder(move |response| Expectation::Delete { key, response })
    }

    /// Expects a `scan`.
    pub fn expect_scan(&mut self) -> ExpectationBuilder<T, Vec<(String, T)>> {
        self.builder(|response| Expectation::Scan { response })
    }

    /// Expects an `apply` for `key`.
    pub fn expect_apply(&mut self, key: impl Into<String>) -> ExpectationBuilder<T, Option<T>> {
        let key = key.into();
        self.builder(move |response| Expectation::Apply { key, response })
    }

    /// Panics if any queued expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Result<R, StoreError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }
}

/// Finishes an expectation by choosing its reply.
pub struct ExpectationBuilder<T: Document, R> {
    expectations: Queue<T>,
    wrap: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation<T> + Send>,
}

impl<T: Document, R> ExpectationBuilder<T, R> {
    /// Reply with a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Reply with an error.
    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, StoreError>) {
        let expectation = (self.wrap)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a client whose requests arrive on the returned receiver.
///
/// Pair with the `expect_*` helpers below to drive the conversation by hand, including
/// replying late or not at all.
pub fn create_mock_client<T: Document>(
    buffer_size: usize,
) -> (CollectionClient<T>, mpsc::Receiver<CollectionRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Responder for a request whose reply is `R`.
pub type Responder<R> = oneshot::Sender<Result<R, StoreError>>;

/// Next message, if it is a `get`.
pub async fn expect_get<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(String, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Get { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a `set`.
pub async fn expect_set<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(String, T, Responder<()>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Set {
            key,
            document,
            respond_to,
        }) => Some((key, document, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a `delete`.
pub async fn expect_delete<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(String, Responder<()>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Delete { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a `scan`.
pub async fn expect_scan<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<Responder<Vec<(String, T)>>> {
    match receiver.recv().await {
        Some(CollectionRequest::Scan { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message, if it is an `apply`.
pub async fn expect_apply<T: Document>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(String, T::Mutation, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Apply {
            key,
            mutation,
            respond_to,
        }) => Some((key, mutation, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Write;

    #[derive(Clone, Debug, PartialEq)]
    struct Note(String);

    #[derive(Debug, thiserror::Error)]
    #[error("notes are not mutable")]
    struct Immutable;

    impl Document for Note {
        type Mutation = ();
        type Error = Immutable;

        fn apply(_: &str, _: Option<&Self>, _: ()) -> Result<Write<Self>, Immutable> {
            Err(Immutable)
        }
    }

    #[tokio::test]
    async fn channel_helpers_see_each_request() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let task = tokio::spawn(async move { client.set("todo", Note("milk".into())).await });

        let (key, doc, responder) = expect_set(&mut receiver).await.expect("Expected Set");
        assert_eq!(key, "todo");
        assert_eq!(doc, Note("milk".into()));
        responder.send(Ok(())).unwrap();

        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn scripted_replies_in_order() {
        let mut mock = MockCollection::<Note>::new();
        mock.expect_get("todo").return_ok(Some(Note("milk".into())));
        mock.expect_delete("todo").return_ok(());
        mock.expect_scan().return_err(StoreError::ServiceClosed);

        let client = mock.client();
        assert_eq!(client.get("todo").await.unwrap(), Some(Note("milk".into())));
        client.delete("todo").await.unwrap();
        assert!(matches!(client.scan().await, Err(StoreError::ServiceClosed)));

        mock.verify();
    }

    #[tokio::test]
    async fn unexpected_request_drops_the_reply() {
        let mut mock = MockCollection::<Note>::new();
        mock.expect_scan().return_ok(Vec::new());

        let result = mock.client().get("todo").await;
        assert!(matches!(result, Err(StoreError::ServiceDropped)));
    }
}
