//! Pure data structures: the inventory item and its stored document body.

pub mod item;

pub use cloud_framework::account::{Session, UserId};
pub use item::*;
