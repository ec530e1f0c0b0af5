//! # Inventory Gateway
//!
//! The only component that writes inventory documents. It checks for a session before
//! every mutation, applies the quantity rules of
//! [`ItemFields`](crate::model::ItemFields), and re-reads the whole collection after each
//! change so callers can replace their cached list.

use super::error::{InventoryError, Mutation};
use crate::model::{InventoryItem, ItemFields, QuantityChange, Session, DEFAULT_CATEGORY};
use async_trait::async_trait;
use cloud_framework::{CollectionAccess, CollectionClient, Document, StoreError, Write};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// How add and remove reach the document store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// One `apply` request; the collection actor reads and writes in a single turn.
    #[default]
    Atomic,
    /// A `get` then a `set`/`delete` from the gateway. Two overlapping calls for the same
    /// item can both read the old quantity, and one of the updates is lost.
    ReadModifyWrite,
}

/// Client for the inventory collection.
#[derive(Clone)]
pub struct InventoryGateway {
    inner: CollectionClient<ItemFields>,
    mode: UpdateMode,
}

#[async_trait]
impl CollectionAccess<ItemFields> for InventoryGateway {
    type Error = InventoryError;

    fn inner(&self) -> &CollectionClient<ItemFields> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        InventoryError::Store(e)
    }
}

fn require_session(session: Option<&Session>, action: Mutation) -> Result<&Session, InventoryError> {
    session.ok_or(InventoryError::Unauthorized { action })
}

impl InventoryGateway {
    pub fn new(inner: CollectionClient<ItemFields>, mode: UpdateMode) -> Self {
        Self { inner, mode }
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Every item in the collection, in the store's scan order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<InventoryItem>, InventoryError> {
        let items: Vec<InventoryItem> = self
            .scan()
            .await?
            .into_iter()
            .map(|(name, fields)| InventoryItem::from_document(name, fields))
            .collect();
        debug!(count = items.len(), "Listed inventory");
        Ok(items)
    }

    /// Adds one unit of `name`, creating the item if needed. Returns the refreshed list.
    #[instrument(skip(self, session))]
    pub async fn add(
        &self,
        session: Option<&Session>,
        name: &str,
    ) -> Result<Vec<InventoryItem>, InventoryError> {
        let session = require_session(session, Mutation::Add)?;
        self.change_quantity(session, name.trim(), QuantityChange::Increment)
            .await?;
        self.list().await
    }

    /// Removes one unit of `name`, deleting the item at zero. Absent items are ignored.
    /// Returns the refreshed list.
    #[instrument(skip(self, session))]
    pub async fn remove(
        &self,
        session: Option<&Session>,
        name: &str,
    ) -> Result<Vec<InventoryItem>, InventoryError> {
        let session = require_session(session, Mutation::Remove)?;
        self.change_quantity(session, name.trim(), QuantityChange::Decrement)
            .await?;
        self.list().await
    }

    /// Overwrites every field of `item` in one write. Returns the refreshed list.
    ///
    /// The write is unconditional: editing an item that another client just deleted
    /// re-creates it. The name is trimmed like in [`add`](Self::add), and an empty
    /// category is stored as `"uncategorized"`.
    #[instrument(skip(self, session))]
    pub async fn edit(
        &self,
        session: Option<&Session>,
        item: &InventoryItem,
    ) -> Result<Vec<InventoryItem>, InventoryError> {
        let session = require_session(session, Mutation::Edit)?;
        if item.quantity == 0 {
            return Err(InventoryError::InvalidQuantity {
                name: item.name.clone(),
                quantity: item.quantity,
            });
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(InventoryError::InvalidPrice {
                name: item.name.clone(),
                price: item.price,
            });
        }

        let (_, mut fields) = item.clone().into_document();
        let name = item.name.trim();
        if fields.category.trim().is_empty() {
            fields.category = DEFAULT_CATEGORY.to_string();
        }
        self.inner.set(name, fields).await?;
        info!(uid = %session.uid, %name, "Item edited");
        self.list().await
    }

    async fn change_quantity(
        &self,
        session: &Session,
        name: &str,
        change: QuantityChange,
    ) -> Result<(), InventoryError> {
        let quantity = match self.mode {
            UpdateMode::Atomic => self
                .inner
                .apply(name, change)
                .await?
                .map(|fields| fields.quantity),
            UpdateMode::ReadModifyWrite => {
                let current = self.get(name.to_string()).await?;
                match ItemFields::apply(name, current.as_ref(), change)
                    .map_err(StoreError::rejected)?
                {
                    Write::Put(fields) => {
                        let quantity = fields.quantity;
                        self.inner.set(name, fields).await?;
                        Some(quantity)
                    }
                    Write::Delete => {
                        self.inner.delete(name).await?;
                        None
                    }
                    Write::Keep => None,
                }
            }
        };
        info!(uid = %session.uid, %name, ?change, ?quantity, "Quantity changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use cloud_framework::mock::{create_mock_client, expect_apply, expect_scan, MockCollection};

    fn session() -> Session {
        Session {
            uid: UserId(1),
            email: "ada@example.com".into(),
        }
    }

    #[tokio::test]
    async fn mutations_without_session_never_reach_the_store() {
        // The mock has no expectations: any request would fail the call.
        let mock = MockCollection::<ItemFields>::new();
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);

        let add = gateway.add(None, "Widget").await.unwrap_err();
        let remove = gateway.remove(None, "Widget").await.unwrap_err();
        let edit = gateway
            .edit(None, &InventoryItem::new("Widget", 3))
            .await
            .unwrap_err();

        assert!(matches!(add, InventoryError::Unauthorized { action: Mutation::Add }));
        assert!(matches!(remove, InventoryError::Unauthorized { action: Mutation::Remove }));
        assert!(matches!(edit, InventoryError::Unauthorized { action: Mutation::Edit }));
        mock.verify();
    }

    #[tokio::test]
    async fn read_modify_write_add_creates_absent_item() {
        let mut mock = MockCollection::<ItemFields>::new();
        mock.expect_get("Widget").return_ok(None);
        mock.expect_set("Widget").return_ok(());
        mock.expect_scan()
            .return_ok(vec![("Widget".into(), ItemFields::with_quantity(1))]);

        let gateway = InventoryGateway::new(mock.client(), UpdateMode::ReadModifyWrite);
        let items = gateway.add(Some(&session()), "  Widget ").await.unwrap();

        assert_eq!(items, vec![InventoryItem::new("Widget", 1)]);
        mock.verify();
    }

    #[tokio::test]
    async fn read_modify_write_remove_deletes_last_unit() {
        let mut mock = MockCollection::<ItemFields>::new();
        mock.expect_get("Widget")
            .return_ok(Some(ItemFields::with_quantity(1)));
        mock.expect_delete("Widget").return_ok(());
        mock.expect_scan().return_ok(Vec::new());

        let gateway = InventoryGateway::new(mock.client(), UpdateMode::ReadModifyWrite);
        let items = gateway.remove(Some(&session()), "Widget").await.unwrap();

        assert!(items.is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn read_modify_write_remove_absent_only_lists() {
        let mut mock = MockCollection::<ItemFields>::new();
        mock.expect_get("Widget").return_ok(None);
        mock.expect_scan().return_ok(Vec::new());

        let gateway = InventoryGateway::new(mock.client(), UpdateMode::ReadModifyWrite);
        gateway.remove(Some(&session()), "Widget").await.unwrap();
        mock.verify();
    }

    #[tokio::test]
    async fn atomic_add_sends_one_apply() {
        let (client, mut receiver) = create_mock_client::<ItemFields>(4);
        let gateway = InventoryGateway::new(client, UpdateMode::Atomic);
        let viewer = session();

        let task = tokio::spawn(async move { gateway.add(Some(&viewer), "Widget").await });

        let (key, change, responder) = expect_apply(&mut receiver).await.expect("Expected Apply");
        assert_eq!(key, "Widget");
        assert_eq!(change, QuantityChange::Increment);
        responder.send(Ok(Some(ItemFields::with_quantity(4)))).unwrap();

        let responder = expect_scan(&mut receiver).await.expect("Expected Scan");
        responder
            .send(Ok(vec![("Widget".into(), ItemFields::with_quantity(4))]))
            .unwrap();

        let items = task.await.unwrap().unwrap();
        assert_eq!(items[0].quantity, 4);
    }

    #[tokio::test]
    async fn edit_validates_before_writing() {
        let mock = MockCollection::<ItemFields>::new();
        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);

        let zero = gateway
            .edit(Some(&session()), &InventoryItem::new("Widget", 0))
            .await
            .unwrap_err();
        assert!(matches!(zero, InventoryError::InvalidQuantity { quantity: 0, .. }));

        let negative = InventoryItem {
            price: -1.0,
            ..InventoryItem::new("Widget", 2)
        };
        let err = gateway.edit(Some(&session()), &negative).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidPrice { .. }));

        let nan = InventoryItem {
            price: f64::NAN,
            ..InventoryItem::new("Widget", 2)
        };
        assert!(gateway.edit(Some(&session()), &nan).await.is_err());
        mock.verify();
    }

    #[tokio::test]
    async fn store_failure_propagates_from_list() {
        let mut mock = MockCollection::<ItemFields>::new();
        mock.expect_scan().return_err(StoreError::ServiceClosed);

        let gateway = InventoryGateway::new(mock.client(), UpdateMode::Atomic);
        let err = gateway.list().await.unwrap_err();
        assert!(matches!(err, InventoryError::Store(StoreError::ServiceClosed)));
    }
}
