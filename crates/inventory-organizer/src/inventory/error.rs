//! Error types for the inventory gateway.

use cloud_framework::StoreError;
use std::fmt;
use thiserror::Error;

/// The mutating gateway operations, named the way they appear in user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Remove,
    Edit,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mutation::Add => "add",
            Mutation::Remove => "remove",
            Mutation::Edit => "edit",
        })
    }
}

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A mutation was attempted without a signed-in session.
    ///
    /// The message is shown to the user verbatim.
    #[error("You must be logged in to {action} items.")]
    Unauthorized { action: Mutation },

    /// An edit tried to store a quantity below one.
    #[error("Invalid quantity for {name}: {quantity} (remove the item instead)")]
    InvalidQuantity { name: String, quantity: u32 },

    /// An edit tried to store a negative or non-finite price.
    #[error("Invalid price for {name}: {price}")]
    InvalidPrice { name: String, price: f64 },

    /// The document store failed or refused the request.
    #[error("Inventory store error: {0}")]
    Store(#[from] StoreError),
}

impl InventoryError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, InventoryError::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_messages_name_the_action() {
        let add = InventoryError::Unauthorized {
            action: Mutation::Add,
        };
        let remove = InventoryError::Unauthorized {
            action: Mutation::Remove,
        };
        assert_eq!(add.to_string(), "You must be logged in to add items.");
        assert_eq!(remove.to_string(), "You must be logged in to remove items.");
        assert!(add.is_unauthorized());
    }
}
