//! The point-of-sale checkout engine.
//!
//! `finalize_sale` runs as one atomic transaction: stock for every cart
//! line is snapshot-read and validated, the decremented stock values are
//! staged, and exactly one order document is staged into the acting
//! identity's partition. Commit is all-or-nothing; on any validation
//! failure no stock changes and no order becomes visible, and the caller's
//! cart is left untouched for correction.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use stockvision_core::{OrderId, OwnerId, ProductId};

use crate::models::{Cart, NewOrder, OrderLine};
use crate::store::{MemoryStore, TransactionError};

/// Why a checkout was rejected.
///
/// Validation variants identify the offending product and are never retried
/// automatically; `Conflict` is transient and safe to retry as a whole.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("product {name} not found")]
    ProductNotFound { id: ProductId, name: String },

    #[error("insufficient stock for {name}: requested {requested}, available {available}")]
    InsufficientStock {
        id: ProductId,
        name: String,
        requested: u32,
        available: u32,
    },

    #[error("checkout aborted by concurrent sales after {attempts} attempts, retry the sale")]
    Conflict { attempts: u32 },
}

/// Proof of a committed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub order_id: OrderId,
    pub total: Decimal,
}

/// Executes checkout transactions against the store.
#[derive(Clone)]
pub struct CheckoutEngine {
    store: MemoryStore,
}

impl CheckoutEngine {
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Atomically decrement stock for every cart line and record one paid
    /// order in `acting`'s partition.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] when the cart holds no lines.
    /// - [`CheckoutError::ProductNotFound`] when a referenced product
    ///   document does not exist.
    /// - [`CheckoutError::InsufficientStock`] when a decrement would drive
    ///   stock negative; names the product and both quantities.
    /// - [`CheckoutError::Conflict`] when concurrent sales exhausted the
    ///   store's retry budget.
    ///
    /// On any error, no stock update and no order is persisted.
    #[instrument(skip(self, cart), fields(lines = cart.len(), acting = %acting))]
    pub async fn finalize_sale(
        &self,
        cart: &Cart,
        acting: &OwnerId,
    ) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let result = self
            .store
            .run_transaction(|tx| {
                let mut items = Vec::with_capacity(cart.len());
                for line in cart.lines() {
                    let product = tx.product(&line.product.id).ok_or_else(|| {
                        CheckoutError::ProductNotFound {
                            id: line.product.id.clone(),
                            name: line.product.name.clone(),
                        }
                    })?;
                    let new_stock = product.stock.checked_sub(line.quantity).ok_or_else(|| {
                        CheckoutError::InsufficientStock {
                            id: product.id.clone(),
                            name: product.name.clone(),
                            requested: line.quantity,
                            available: product.stock,
                        }
                    })?;
                    tx.set_product_stock(&line.product.id, new_stock);
                    // Name and price are snapshotted from the cart, the
                    // values the sale was rung up at.
                    items.push(OrderLine {
                        product_id: line.product.id.clone(),
                        name: line.product.name.clone(),
                        quantity: line.quantity,
                        unit_price: line.product.price,
                    });
                }
                Ok(tx.create_order(NewOrder::paid(acting.clone(), items)))
            })
            .await;

        match result {
            Ok(order_id) => {
                let total = cart.total();
                tracing::info!(%order_id, %total, "sale finalized");
                Ok(Receipt { order_id, total })
            }
            Err(TransactionError::Aborted(err)) => {
                tracing::warn!(error = %err, "checkout rejected");
                Err(err)
            }
            Err(TransactionError::Conflict { attempts }) => {
                tracing::warn!(attempts, "checkout lost every conflict retry");
                Err(CheckoutError::Conflict { attempts })
            }
        }
    }
}
