//! Document store for the product catalog, user profiles, and orders.
//!
//! # Layout
//!
//! - `products` - product collection keyed by product id
//! - `users` - profile collection keyed by user id
//! - `users/{owner}/orders` - per-owner order partitions keyed by order id;
//!   walk-in point-of-sale orders live under the anonymous sentinel owner
//!
//! Orders are never stored anywhere not reachable by either the direct
//! per-owner path or the cross-partition search.
//!
//! # Primitives
//!
//! The store exposes two primitives the domain services build on:
//!
//! - a transactional read-modify-write unit of work with atomic commit or
//!   full rollback, retried a bounded number of times on write conflict
//!   ([`MemoryStore::run_transaction`])
//! - a real-time subscription delivering an initial result set and then
//!   re-evaluations on every change, with a terminal error channel distinct
//!   from data delivery ([`MemoryStore::subscribe_orders`])

use thiserror::Error;

use stockvision_core::{OrderId, OwnerId};

pub mod memory;
pub mod seed;

pub use memory::{MemoryStore, OrderSubscription, Transaction};

/// Storage path of one order document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPath {
    pub owner: OwnerId,
    pub order: OrderId,
}

impl std::fmt::Display for OrderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "users/{}/orders/{}", self.owner, self.order)
    }
}

/// Which slice of the order collection a query or subscription covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    /// One owner's partition.
    Partition(OwnerId),
    /// Every partition, as used by the admin views.
    AllPartitions,
}

/// Change notification broadcast by the store after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ProductsChanged,
    OrdersChanged,
}

/// Fault injection point for tests exercising lookup-failure paths.
///
/// The in-memory backend cannot fail on its own; a remote document store
/// can, and the services must treat those failures as "cannot determine
/// access" rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// Fail profile reads.
    ProfileReads,
    /// Fail the cross-partition order search.
    OrderSearch,
}

/// Store-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The read set changed under the transaction on every attempt.
    #[error("transaction aborted by conflicting writes after {attempts} attempts")]
    Conflict { attempts: u32 },

    /// The underlying store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(&'static str),

    /// The subscription's change channel is gone.
    #[error("subscription closed")]
    SubscriptionClosed,
}

/// Outcome of a transactional unit of work.
#[derive(Debug, Error)]
pub enum TransactionError<E> {
    /// The unit of work itself rejected the transaction; nothing was
    /// written.
    #[error(transparent)]
    Aborted(E),

    /// Conflicting concurrent commits exhausted the retry budget; nothing
    /// was written. Safe to retry the whole operation.
    #[error("transaction aborted by conflicting writes after {attempts} attempts")]
    Conflict { attempts: u32 },
}

#[cfg(test)]
mod tests {
    use stockvision_core::UserId;

    use super::*;

    #[test]
    fn order_path_displays_like_a_document_path() {
        let path = OrderPath {
            owner: OwnerId::User(UserId::new("user_2")),
            order: OrderId::new("ord_1"),
        };
        assert_eq!(path.to_string(), "users/user_2/orders/ord_1");

        let pos = OrderPath {
            owner: OwnerId::PosSale,
            order: OrderId::new("ord_2"),
        };
        assert_eq!(pos.to_string(), "users/anonymous_pos_sale/orders/ord_2");
    }
}
