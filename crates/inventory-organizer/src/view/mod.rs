//! # View
//!
//! The state behind the inventory screen and the controller that updates it.
//!
//! - [`state`] - [`AppState`], plain data constructed per view (or per test)
//! - [`controller`] - [`InventoryView`], one method per user intent
//!
//! Unauthorized mutations and account rejections end up in [`AppState::auth_error`] as
//! user-facing text. Store failures are returned to the caller.

pub mod controller;
pub mod state;

pub use controller::*;
pub use state::*;
