//! # Inventory
//!
//! Everything that reads or writes the `inventory` collection, plus the client-side
//! filter over the fetched list.
//!
//! ## Structure
//!
//! - [`gateway`] - [`InventoryGateway`], the session-checked list/add/remove/edit client
//! - [`error`] - [`InventoryError`] and the [`Mutation`] names used in its messages
//! - [`search`] - [`filter`] and [`categories`], pure functions over `&[InventoryItem]`
//! - [`new()`] - Factory that creates the collection actor and its gateway
//!
//! ## Usage
//!
//! ```rust
//! use inventory_organizer::config::InventorySettings;
//! use inventory_organizer::inventory;
//! use inventory_organizer::model::{Session, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, gateway) = inventory::new(&InventorySettings::default());
//!     tokio::spawn(actor.run());
//!
//!     let session = Session { uid: UserId(1), email: "ada@example.com".into() };
//!     gateway.add(Some(&session), "Widget").await?;
//!     let items = gateway.add(Some(&session), "Widget").await?;
//!     assert_eq!(items[0].quantity, 2);
//!
//!     assert!(gateway.add(None, "Widget").await.is_err());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod search;

pub use error::*;
pub use gateway::*;
pub use search::*;

use crate::config::InventorySettings;
use crate::model::ItemFields;
use cloud_framework::CollectionActor;

/// Creates the inventory collection actor and a gateway bound to it.
///
/// # Panics
///
/// Panics if `settings.channel_capacity` is zero.
pub fn new(settings: &InventorySettings) -> (CollectionActor<ItemFields>, InventoryGateway) {
    let (actor, client) =
        CollectionActor::new(settings.collection.clone(), settings.channel_capacity);
    (actor, InventoryGateway::new(client, settings.update_mode))
}
