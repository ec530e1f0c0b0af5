//! Inventory items and their stored document body.
//!
//! # Document Store
//! The item is persisted as one document whose key is [`InventoryItem::name`] and whose
//! body is [`ItemFields`]. [`ItemFields`] implements the
//! [`Document`](cloud_framework::Document) trait, so quantity changes can be applied
//! atomically by the collection actor.
//!
//! See [`impl Document for ItemFields`](ItemFields#impl-Document-for-ItemFields) for the
//! quantity rules.
use cloud_framework::{Document, Write};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category given to items that never had one.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// An inventory item as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
    pub description: String,
    pub price: f64,
    pub category: String,
}

impl InventoryItem {
    /// Creates an item with default description, price and category.
    ///
    /// # Arguments
    /// * `name` - Item name, also the document key
    /// * `quantity` - Units on hand
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self::from_document(name.into(), ItemFields::with_quantity(quantity))
    }

    /// Joins a document key and body back into an item.
    pub fn from_document(name: String, fields: ItemFields) -> Self {
        Self {
            name,
            quantity: fields.quantity,
            description: fields.description,
            price: fields.price,
            category: fields.category,
        }
    }

    /// Splits the item into its document key and body.
    pub fn into_document(self) -> (String, ItemFields) {
        let fields = ItemFields {
            quantity: self.quantity,
            description: self.description,
            price: self.price,
            category: self.category,
        };
        (self.name, fields)
    }
}

/// Stored body of an inventory document: every item field except the name.
///
/// `quantity` is required. The other fields fall back to their defaults, so a body
/// written with only a `quantity` still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFields {
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for ItemFields {
    fn default() -> Self {
        Self {
            quantity: 0,
            description: String::new(),
            price: 0.0,
            category: default_category(),
        }
    }
}

impl ItemFields {
    pub fn with_quantity(quantity: u32) -> Self {
        Self {
            quantity,
            ..Self::default()
        }
    }
}

/// A one-unit change to an item's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Creates the item with one unit, or adds one unit.
    Increment,
    /// Removes one unit; removing the last unit deletes the item. Absent items are left alone.
    Decrement,
}

/// Errors raised while applying a [`QuantityChange`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Quantity of {0:?} cannot grow any further")]
    Overflow(String),
}

impl Document for ItemFields {
    type Mutation = QuantityChange;
    type Error = QuantityError;

    fn apply(
        key: &str,
        current: Option<&Self>,
        change: QuantityChange,
    ) -> Result<Write<Self>, QuantityError> {
        match (change, current) {
            (QuantityChange::Increment, None) => Ok(Write::Put(Self::with_quantity(1))),
            (QuantityChange::Increment, Some(fields)) => {
                let quantity = fields
                    .quantity
                    .checked_add(1)
                    .ok_or_else(|| QuantityError::Overflow(key.to_string()))?;
                Ok(Write::Put(Self {
                    quantity,
                    ..fields.clone()
                }))
            }
            (QuantityChange::Decrement, None) => Ok(Write::Keep),
            (QuantityChange::Decrement, Some(fields)) if fields.quantity <= 1 => Ok(Write::Delete),
            (QuantityChange::Decrement, Some(fields)) => Ok(Write::Put(Self {
                quantity: fields.quantity - 1,
                ..fields.clone()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(quantity: u32) -> ItemFields {
        ItemFields {
            quantity,
            description: "zinc plated".into(),
            price: 0.25,
            category: "hardware".into(),
        }
    }

    #[test]
    fn increment_creates_then_counts_up() {
        let created = ItemFields::apply("Bolt", None, QuantityChange::Increment).unwrap();
        assert_eq!(created, Write::Put(ItemFields::with_quantity(1)));

        let bumped = ItemFields::apply("Bolt", Some(&priced(4)), QuantityChange::Increment).unwrap();
        assert_eq!(bumped, Write::Put(priced(5)));
    }

    #[test]
    fn decrement_deletes_the_last_unit() {
        assert_eq!(
            ItemFields::apply("Bolt", Some(&priced(3)), QuantityChange::Decrement).unwrap(),
            Write::Put(priced(2))
        );
        assert_eq!(
            ItemFields::apply("Bolt", Some(&priced(1)), QuantityChange::Decrement).unwrap(),
            Write::Delete
        );
        assert_eq!(
            ItemFields::apply("Bolt", None, QuantityChange::Decrement).unwrap(),
            Write::Keep
        );
    }

    #[test]
    fn increment_refuses_to_wrap() {
        let err = ItemFields::apply("Bolt", Some(&priced(u32::MAX)), QuantityChange::Increment)
            .unwrap_err();
        assert_eq!(err, QuantityError::Overflow("Bolt".into()));
    }

    #[test]
    fn sparse_body_gets_defaults() {
        let fields: ItemFields = toml::from_str("quantity = 3").unwrap();
        assert_eq!(fields, ItemFields::with_quantity(3));
        assert_eq!(fields.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn body_without_quantity_is_rejected() {
        let result: Result<ItemFields, _> =
            toml::from_str("description = \"lost count\"\ncategory = \"tools\"");
        assert!(result.is_err());
    }

    #[test]
    fn document_round_trip_keeps_name() {
        let item = InventoryItem::from_document("Bolt".into(), priced(2));
        let (name, fields) = item.clone().into_document();
        assert_eq!(name, "Bolt");
        assert_eq!(InventoryItem::from_document(name, fields), item);
    }
}
