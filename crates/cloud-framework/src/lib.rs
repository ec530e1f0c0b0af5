//! # Cloud Framework
//!
//! In-process stand-ins for two hosted services an application talks to over the network:
//! a **document store** and an **account service**. Each runs as an actor in its own Tokio
//! task and is reached only through a cloneable client, so application code sees the same
//! async request/response boundary a remote client library would give it.
//!
//! ## Architecture Overview
//!
//! 1. **Document Layer** ([`Document`]) - record bodies and their single-key mutation rules
//! 2. **Runtime Layer** ([`CollectionActor`], [`account::AccountActor`]) - sequential message processing
//! 3. **Interface Layer** ([`CollectionClient`], [`account::AccountClient`], [`CollectionAccess`]) - typed requests
//!
//! ## Document Store Contract
//!
//! A collection maps string keys to documents of one type `T: Document`:
//!
//! | Operation | Meaning |
//! |-----------|---------|
//! | `get(key)` | point read, `None` when absent |
//! | `set(key, doc)` | full replace, never a merge |
//! | `delete(key)` | point delete, absent keys are fine |
//! | `scan()` | every `(key, doc)` pair in key order |
//! | `apply(key, mutation)` | read and write in one actor turn |
//!
//! A `get` followed by a `set` from a client is two turns; another client's request can
//! land in between. `apply` cannot be interleaved.
//!
//! ```rust
//! use cloud_framework::{CollectionActor, Document, Write};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Visits(u32);
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("too many visits")]
//! struct Overflow;
//!
//! impl Document for Visits {
//!     type Mutation = ();
//!     type Error = Overflow;
//!
//!     fn apply(_key: &str, current: Option<&Self>, _: ()) -> Result<Write<Self>, Overflow> {
//!         let next = current.map_or(Some(1), |v| v.0.checked_add(1)).ok_or(Overflow)?;
//!         Ok(Write::Put(Visits(next)))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = CollectionActor::<Visits>::new("visits", 8);
//!     tokio::spawn(actor.run());
//!
//!     client.apply("home", ()).await.unwrap();
//!     client.apply("home", ()).await.unwrap();
//!     assert_eq!(client.get("home").await.unwrap(), Some(Visits(2)));
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockCollection`] answers collection requests from a script, and
//! [`mock::create_mock_client`] hands each request to the test. Both let client-side logic
//! be tested without a running actor.

pub mod account;
pub mod client;
pub mod client_trait;
pub mod collection;
pub mod document;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use client::CollectionClient;
pub use client_trait::CollectionAccess;
pub use collection::CollectionActor;
pub use document::{validate_key, Document, Write};
pub use error::StoreError;
pub use message::{CollectionRequest, Response};
