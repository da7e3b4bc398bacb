//! In-memory document store.
//!
//! Transactions use optimistic version checking: the unit of work runs
//! against a read snapshot, recording the version of every document it
//! read; at commit time the writer lock is taken and the recorded versions
//! are compared against the live documents. A mismatch means a conflicting
//! commit landed in between, and the whole unit of work re-runs against
//! fresh data, up to a bounded number of attempts. Conflicting checkouts
//! therefore serialize instead of corrupting stock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use stockvision_core::{OrderId, OwnerId, ProductId, UserId};

use crate::models::{NewOrder, Order, Product, UserProfile};

use super::{OrderPath, OrderScope, StoreError, StoreEvent, StoreFault, TransactionError};

/// Retry budget for optimistic transactions.
const MAX_TRANSACTION_ATTEMPTS: u32 = 5;

/// Broadcast capacity for change notifications.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A document plus its commit version.
#[derive(Debug, Clone)]
struct Versioned<T> {
    version: u64,
    value: T,
}

#[derive(Default)]
struct Documents {
    products: HashMap<ProductId, Versioned<Product>>,
    profiles: HashMap<UserId, UserProfile>,
    orders: HashMap<OwnerId, HashMap<OrderId, Order>>,
}

struct Inner {
    docs: RwLock<Documents>,
    changes: broadcast::Sender<StoreEvent>,
    fault: Mutex<Option<StoreFault>>,
}

/// The in-memory document store.
///
/// Cheaply cloneable; clones share the same documents and change channel.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                docs: RwLock::new(Documents::default()),
                changes,
                fault: Mutex::new(None),
            }),
        }
    }

    /// Inject (or clear) a fault on the next matching operations.
    ///
    /// Used by tests to exercise the lookup-failure error paths the
    /// in-memory backend cannot produce on its own.
    pub fn set_fault(&self, fault: Option<StoreFault>) {
        *self.inner.fault.lock().expect("mutex poisoned") = fault;
    }

    fn has_fault(&self, fault: StoreFault) -> bool {
        *self.inner.fault.lock().expect("mutex poisoned") == Some(fault)
    }

    // =========================================================================
    // Product catalog
    // =========================================================================

    /// Insert or replace a product document.
    ///
    /// Catalog management is outside the checkout core; this entry point
    /// exists for seeding and tests.
    pub async fn insert_product(&self, product: Product) {
        {
            let mut docs = self.inner.docs.write().expect("RwLock poisoned");
            let version = docs
                .products
                .get(&product.id)
                .map_or(1, |existing| existing.version + 1);
            docs.products
                .insert(product.id.clone(), Versioned { version, value: product });
        }
        let _ = self.inner.changes.send(StoreEvent::ProductsChanged);
    }

    /// Read one product.
    pub async fn product(&self, id: &ProductId) -> Option<Product> {
        let docs = self.inner.docs.read().expect("RwLock poisoned");
        docs.products.get(id).map(|v| v.value.clone())
    }

    /// Read the whole catalog, sorted by name.
    pub async fn products(&self) -> Vec<Product> {
        let docs = self.inner.docs.read().expect("RwLock poisoned");
        let mut products: Vec<_> = docs.products.values().map(|v| v.value.clone()).collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    /// Products at or below their minimum stock level, sorted by name.
    pub async fn low_stock_products(&self) -> Vec<Product> {
        let mut products = self.products().await;
        products.retain(Product::is_low_stock);
        products
    }

    // =========================================================================
    // User profiles
    // =========================================================================

    /// Insert or replace a user profile.
    pub async fn upsert_profile(&self, profile: UserProfile) {
        let mut docs = self.inner.docs.write().expect("RwLock poisoned");
        docs.profiles.insert(profile.id.clone(), profile);
    }

    /// Read one profile.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when a profile-read fault is
    /// injected; a remote backend would fail here on its own.
    pub async fn profile(&self, user: &UserId) -> Result<Option<UserProfile>, StoreError> {
        if self.has_fault(StoreFault::ProfileReads) {
            return Err(StoreError::Unavailable("profile read failed"));
        }
        let docs = self.inner.docs.read().expect("RwLock poisoned");
        Ok(docs.profiles.get(user).cloned())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Read one order by its exact path.
    pub async fn order(&self, path: &OrderPath) -> Option<Order> {
        let docs = self.inner.docs.read().expect("RwLock poisoned");
        docs.orders
            .get(&path.owner)
            .and_then(|partition| partition.get(&path.order))
            .cloned()
    }

    /// List orders in the given scope, newest first.
    pub async fn orders(&self, scope: &OrderScope) -> Vec<Order> {
        let docs = self.inner.docs.read().expect("RwLock poisoned");
        let mut orders: Vec<Order> = match scope {
            OrderScope::Partition(owner) => docs
                .orders
                .get(owner)
                .map(|partition| partition.values().cloned().collect())
                .unwrap_or_default(),
            OrderScope::AllPartitions => docs
                .orders
                .values()
                .flat_map(|partition| partition.values().cloned())
                .collect(),
        };
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders
    }

    /// Search every partition for an order with the given id.
    ///
    /// Order ids are generated at creation, so at most one partition can
    /// hold a match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when a search fault is injected.
    pub async fn find_order(&self, id: &OrderId) -> Result<Option<OrderPath>, StoreError> {
        if self.has_fault(StoreFault::OrderSearch) {
            return Err(StoreError::Unavailable("cross-partition order search failed"));
        }
        let docs = self.inner.docs.read().expect("RwLock poisoned");
        Ok(docs.orders.iter().find_map(|(owner, partition)| {
            partition.contains_key(id).then(|| OrderPath {
                owner: owner.clone(),
                order: id.clone(),
            })
        }))
    }

    /// Open a real-time subscription over the given order scope.
    ///
    /// The first `next()` delivers the current result set; every later
    /// `next()` waits for a change and delivers the re-evaluated set.
    #[must_use]
    pub fn subscribe_orders(&self, scope: OrderScope) -> OrderSubscription {
        OrderSubscription {
            store: self.clone(),
            scope,
            changes: self.inner.changes.subscribe(),
            delivered_initial: false,
        }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Run a transactional unit of work.
    ///
    /// `work` may run several times; it must be free of side effects other
    /// than reads and staged writes on the passed [`Transaction`]. On
    /// commit, either every staged write is applied or none is.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::Aborted`] when `work` returns an error; nothing
    ///   is written and the error is handed back untouched.
    /// - [`TransactionError::Conflict`] when conflicting commits kept
    ///   invalidating the read set for the whole retry budget.
    pub async fn run_transaction<T, E, F>(&self, mut work: F) -> Result<T, TransactionError<E>>
    where
        F: FnMut(&mut Transaction<'_>) -> Result<T, E>,
    {
        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            let (value, reads, writes) = {
                let docs = self.inner.docs.read().expect("RwLock poisoned");
                let mut tx = Transaction {
                    docs: &docs,
                    reads: Vec::new(),
                    writes: Vec::new(),
                };
                match work(&mut tx) {
                    Ok(value) => (value, tx.reads, tx.writes),
                    Err(err) => return Err(TransactionError::Aborted(err)),
                }
            };

            let committed = {
                let mut docs = self.inner.docs.write().expect("RwLock poisoned");
                let unchanged = reads
                    .iter()
                    .all(|(id, version)| docs.products.get(id).map(|v| v.version) == *version);
                if unchanged {
                    Some(Self::apply(&mut docs, writes))
                } else {
                    None
                }
            };

            if let Some(events) = committed {
                for event in events {
                    let _ = self.inner.changes.send(event);
                }
                return Ok(value);
            }

            tracing::debug!(attempt, "transaction read set changed, retrying");
            tokio::task::yield_now().await;
        }

        Err(TransactionError::Conflict {
            attempts: MAX_TRANSACTION_ATTEMPTS,
        })
    }

    /// Apply staged writes under the writer lock. Returns the change events
    /// to broadcast after the lock is released.
    fn apply(docs: &mut Documents, writes: Vec<StagedWrite>) -> Vec<StoreEvent> {
        let mut products_changed = false;
        let mut orders_changed = false;

        for write in writes {
            match write {
                StagedWrite::ProductStock { id, new_stock } => {
                    if let Some(entry) = docs.products.get_mut(&id) {
                        entry.value.stock = new_stock;
                        entry.version += 1;
                        products_changed = true;
                    }
                }
                StagedWrite::CreateOrder { id, order } => {
                    let owner = order.owner.clone();
                    let committed = Order {
                        id: id.clone(),
                        owner: order.owner,
                        items: order.items,
                        total_amount: order.total_amount,
                        status: order.status,
                        // Timestamp is assigned here, at write time, not
                        // when the order was staged.
                        created_at: Utc::now(),
                    };
                    docs.orders.entry(owner).or_default().insert(id, committed);
                    orders_changed = true;
                }
            }
        }

        let mut events = Vec::new();
        if products_changed {
            events.push(StoreEvent::ProductsChanged);
        }
        if orders_changed {
            events.push(StoreEvent::OrdersChanged);
        }
        events
    }
}

/// A staged write inside a transaction.
#[derive(Debug, Clone)]
enum StagedWrite {
    ProductStock { id: ProductId, new_stock: u32 },
    CreateOrder { id: OrderId, order: NewOrder },
}

/// Handle passed to a transactional unit of work.
///
/// Reads are served from a consistent snapshot and recorded; writes are
/// staged and applied atomically at commit.
pub struct Transaction<'a> {
    docs: &'a Documents,
    reads: Vec<(ProductId, Option<u64>)>,
    writes: Vec<StagedWrite>,
}

impl<'a> Transaction<'a> {
    /// Snapshot-read a product, recording its version (or its absence) for
    /// the commit-time conflict check.
    pub fn product(&mut self, id: &ProductId) -> Option<&'a Product> {
        let entry = self.docs.products.get(id);
        self.reads.push((id.clone(), entry.map(|v| v.version)));
        entry.map(|v| &v.value)
    }

    /// Stage a stock update for a product.
    pub fn set_product_stock(&mut self, id: &ProductId, new_stock: u32) {
        self.writes.push(StagedWrite::ProductStock {
            id: id.clone(),
            new_stock,
        });
    }

    /// Stage the creation of exactly one order document, returning the id
    /// it will be stored under.
    ///
    /// Ids are generated here rather than supplied by the caller, which
    /// keeps order ids globally unique and makes the cross-partition search
    /// unambiguous.
    pub fn create_order(&mut self, order: NewOrder) -> OrderId {
        let id = OrderId::new(Uuid::new_v4().to_string());
        self.writes.push(StagedWrite::CreateOrder {
            id: id.clone(),
            order,
        });
        id
    }
}

/// A live subscription over an order scope.
///
/// Data arrives through `Ok` results; a terminal failure arrives once as an
/// `Err`, after which the subscription should be dropped.
pub struct OrderSubscription {
    store: MemoryStore,
    scope: OrderScope,
    changes: broadcast::Receiver<StoreEvent>,
    delivered_initial: bool,
}

impl OrderSubscription {
    /// The next result set: the initial snapshot first, then one
    /// re-evaluation per relevant change.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SubscriptionClosed`] when the store's change
    /// channel is gone.
    pub async fn next(&mut self) -> Result<Vec<Order>, StoreError> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Ok(self.store.orders(&self.scope).await);
        }
        loop {
            match self.changes.recv().await {
                Ok(StoreEvent::OrdersChanged) => {
                    return Ok(self.store.orders(&self.scope).await);
                }
                Ok(StoreEvent::ProductsChanged) => {}
                // Missed notifications collapse into one re-evaluation.
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    return Ok(self.store.orders(&self.scope).await);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(StoreError::SubscriptionClosed);
                }
            }
        }
    }

    /// The scope this subscription covers.
    #[must_use]
    pub const fn scope(&self) -> &OrderScope {
        &self.scope
    }
}
