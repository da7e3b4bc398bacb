//! Role-aware order location and listing.
//!
//! A regular user's order path is deterministic: their own partition plus
//! the order id, no search performed. An administrator does not know which
//! partition holds an order, so lookup goes through the store's
//! cross-partition search by identifier. Not-found is a normal outcome; a
//! failing search mechanism is a distinct error carrying the cause.

use thiserror::Error;
use tracing::instrument;

use stockvision_core::{OrderId, OwnerId};

use crate::models::Order;
use crate::store::{MemoryStore, OrderPath, OrderScope, StoreError};

use super::roles::AccessLevel;

/// Why an order could not be located.
#[derive(Debug, Error)]
pub enum LocateError {
    /// No partition holds this order.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The search mechanism itself failed; the cause is preserved.
    #[error("order search failed: {0}")]
    Search(#[from] StoreError),
}

/// Role-aware read access to the order collection.
#[derive(Clone)]
pub struct OrderDirectory {
    store: MemoryStore,
}

impl OrderDirectory {
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// The order scope `caller` may read at `level`.
    #[must_use]
    pub fn scope_for(level: AccessLevel, caller: &OwnerId) -> OrderScope {
        match level {
            AccessLevel::Admin => OrderScope::AllPartitions,
            AccessLevel::Standard => OrderScope::Partition(caller.clone()),
        }
    }

    /// Resolve the storage path of `order_id` as seen by `caller`.
    ///
    /// # Errors
    ///
    /// - [`LocateError::NotFound`] when the admin search matches nothing.
    /// - [`LocateError::Search`] when the search mechanism fails.
    ///
    /// The non-admin path never errors: it is computed, not searched, and
    /// says nothing about whether the order exists.
    #[instrument(skip(self), fields(admin = level.is_admin(), order = %order_id))]
    pub async fn locate_order(
        &self,
        level: AccessLevel,
        caller: &OwnerId,
        order_id: &OrderId,
    ) -> Result<OrderPath, LocateError> {
        match level {
            AccessLevel::Standard => Ok(OrderPath {
                owner: caller.clone(),
                order: order_id.clone(),
            }),
            AccessLevel::Admin => self
                .store
                .find_order(order_id)
                .await?
                .ok_or_else(|| LocateError::NotFound(order_id.clone())),
        }
    }

    /// Locate and fetch an order.
    ///
    /// Returns `Ok(None)` both when the order does not exist and when it
    /// lives outside the caller's partition; the store cannot distinguish
    /// the two for a non-admin, so neither can we.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::Search`] when the admin search fails.
    pub async fn fetch_order(
        &self,
        level: AccessLevel,
        caller: &OwnerId,
        order_id: &OrderId,
    ) -> Result<Option<Order>, LocateError> {
        match self.locate_order(level, caller, order_id).await {
            Ok(path) => Ok(self.store.order(&path).await),
            Err(LocateError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// List the orders visible to `caller`, newest first: every partition
    /// for an admin, only their own otherwise.
    pub async fn list_orders(&self, level: AccessLevel, caller: &OwnerId) -> Vec<Order> {
        self.store.orders(&Self::scope_for(level, caller)).await
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use stockvision_core::{Price, ProductId, UserId};

    use crate::models::{Cart, Product};
    use crate::services::checkout::CheckoutEngine;
    use crate::store::StoreFault;

    use super::*;

    fn product(id: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            code: format!("779{id}"),
            name: format!("Producto {id}"),
            category: "Almacén".to_owned(),
            price: Price::new(dec!(100.00)),
            stock,
            min_stock: 5,
            provider: "Distribuidora S.A.".to_owned(),
            image_url: format!("https://picsum.photos/seed/{id}/400/400"),
        }
    }

    /// Seed one product and place one order per given owner, returning the
    /// order ids in placement order.
    async fn store_with_orders(owners: &[OwnerId]) -> (MemoryStore, Vec<OrderId>) {
        let store = MemoryStore::new();
        store.insert_product(product("p1", 100)).await;
        let engine = CheckoutEngine::new(store.clone());
        let mut ids = Vec::new();
        for owner in owners {
            let mut cart = Cart::default();
            cart.insert(product("p1", 100), 1).expect("cart");
            let receipt = engine.finalize_sale(&cart, owner).await.expect("sale");
            ids.push(receipt.order_id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn non_admin_path_is_deterministic_and_search_free() {
        let store = MemoryStore::new();
        // Searches would fail; the non-admin path must not perform one.
        store.set_fault(Some(StoreFault::OrderSearch));
        let directory = OrderDirectory::new(store);

        let caller = OwnerId::User(UserId::new("user_3"));
        let path = directory
            .locate_order(AccessLevel::Standard, &caller, &OrderId::new("does_not_exist"))
            .await
            .expect("deterministic path");
        assert_eq!(path.owner, caller);
        assert_eq!(path.order, OrderId::new("does_not_exist"));
    }

    #[tokio::test]
    async fn admin_search_finds_the_owning_partition() {
        let owner = OwnerId::User(UserId::new("user_3"));
        let (store, ids) = store_with_orders(&[owner.clone()]).await;
        let directory = OrderDirectory::new(store);

        let path = directory
            .locate_order(AccessLevel::Admin, &OwnerId::User(UserId::new("user_1")), &ids[0])
            .await
            .expect("found");
        assert_eq!(path.owner, owner);
    }

    #[tokio::test]
    async fn admin_search_distinguishes_not_found_from_search_failure() {
        let (store, _) = store_with_orders(&[OwnerId::PosSale]).await;
        let directory = OrderDirectory::new(store.clone());
        let admin = OwnerId::User(UserId::new("user_1"));

        let missing = directory
            .locate_order(AccessLevel::Admin, &admin, &OrderId::new("missing"))
            .await;
        assert!(matches!(missing, Err(LocateError::NotFound(_))));

        store.set_fault(Some(StoreFault::OrderSearch));
        let broken = directory
            .locate_order(AccessLevel::Admin, &admin, &OrderId::new("missing"))
            .await;
        assert!(matches!(broken, Err(LocateError::Search(StoreError::Unavailable(_)))));
    }

    #[tokio::test]
    async fn fetch_order_reports_foreign_orders_as_absent_for_non_admins() {
        let owner = OwnerId::User(UserId::new("user_3"));
        let (store, ids) = store_with_orders(&[owner.clone()]).await;
        let directory = OrderDirectory::new(store);

        let other = OwnerId::User(UserId::new("user_2"));
        let hidden = directory
            .fetch_order(AccessLevel::Standard, &other, &ids[0])
            .await
            .expect("no search involved");
        assert!(hidden.is_none());

        let own = directory
            .fetch_order(AccessLevel::Standard, &owner, &ids[0])
            .await
            .expect("own partition");
        assert!(own.is_some());
    }

    #[tokio::test]
    async fn listing_scopes_follow_the_access_level() {
        let user = OwnerId::User(UserId::new("user_3"));
        let (store, _) = store_with_orders(&[user.clone(), OwnerId::PosSale]).await;
        let directory = OrderDirectory::new(store);

        let admin_view = directory
            .list_orders(AccessLevel::Admin, &OwnerId::User(UserId::new("user_1")))
            .await;
        assert_eq!(admin_view.len(), 2);

        let own_view = directory.list_orders(AccessLevel::Standard, &user).await;
        assert_eq!(own_view.len(), 1);
        assert_eq!(own_view[0].owner, user);
    }
}
