//! # System Lifecycle
//!
//! [`InventorySystem`] creates the collection and account actors, spawns each in its own
//! Tokio task and keeps their handles.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the request channels
//! 2. **Actors detect closure** - `receiver.recv()` returns `None` and the loop ends
//! 3. **Await completion** - a panicked actor surfaces as a `JoinError`
//!
//! The account actor also owns the session `watch` sender, so open
//! [`Subscription`](crate::session::Subscription)s end once it stops.

pub mod inventory_system;

pub use inventory_system::*;
