//! # Collection Messages
//!
//! Request types sent from a [`CollectionClient`](crate::CollectionClient) to a
//! [`CollectionActor`](crate::CollectionActor).

use crate::document::Document;
use crate::error::StoreError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the collection.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Internal message type sent to the collection actor.
///
/// The variants are the document-store contract: point read, full-replace write,
/// point delete, full scan, plus `Apply` for a single-key atomic mutation.
#[derive(Debug)]
pub enum CollectionRequest<T: Document> {
    Get {
        key: String,
        respond_to: Response<Option<T>>,
    },
    Set {
        key: String,
        document: T,
        respond_to: Response<()>,
    },
    Delete {
        key: String,
        respond_to: Response<()>,
    },
    Scan {
        respond_to: Response<Vec<(String, T)>>,
    },
    Apply {
        key: String,
        mutation: T::Mutation,
        respond_to: Response<Option<T>>,
    },
}
