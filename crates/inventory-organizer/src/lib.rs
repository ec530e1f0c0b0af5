//! # Inventory Organizer
//!
//! Inventory tracking for signed-in users: items are counted, described, priced and
//! categorized in a keyed document collection, and every mutation requires a session.
//!
//! ## Core Components
//!
//! - **[model]**: [`InventoryItem`](model::InventoryItem) and its stored body [`ItemFields`](model::ItemFields)
//! - **[inventory]**: [`InventoryGateway`](inventory::InventoryGateway), the only writer, plus the client-side [`filter`](inventory::filter)
//! - **[session]**: [`SessionGate`](session::SessionGate) and session subscriptions
//! - **[view]**: [`AppState`](view::AppState) and the [`InventoryView`](view::InventoryView) controller
//! - **[config]**: TOML and environment configuration
//! - **[lifecycle]**: [`InventorySystem`](lifecycle::InventorySystem), which starts and stops the services
//!
//! ## Quick Start
//!
//! The binary in `main.rs` runs the whole flow: sign up, add and remove items, edit one,
//! filter the list and sign out.
//!
//! ## Testing
//!
//! See [`cloud_framework::mock`] for utilities to test the gateway without a running
//! collection actor.

pub mod config;
pub mod inventory;
pub mod lifecycle;
pub mod model;
pub mod session;
pub mod view;
