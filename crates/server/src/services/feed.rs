//! Live order feed.
//!
//! Combines role resolution with the store's subscription primitive. The
//! readiness sequencing is a small state machine: no role-dependent query
//! is issued until the viewer's role is resolved, so a feed can never be
//! opened over the wrong scope by stale role state. The states are a
//! tagged variant, not boolean flags, so an impossible combination (data
//! flowing while the role is still pending) cannot be represented.

use thiserror::Error;

use stockvision_core::{OwnerId, UserId};

use crate::models::Order;
use crate::store::{MemoryStore, OrderSubscription, StoreError};

use super::orders::OrderDirectory;
use super::roles::{RoleError, RoleResolver};

/// Observable lifecycle of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Created; nothing resolved or queried yet.
    Uninitialized,
    /// Role resolution in flight; no query issued.
    RolePending,
    /// Role resolved and the subscription is open.
    QueryActive,
    /// Terminally failed; create a new feed to recover.
    Failed,
}

/// Why the feed stopped.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Role resolution failed; the scope could not be chosen.
    #[error(transparent)]
    Role(#[from] RoleError),

    /// The subscription delivered its terminal error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The feed already failed earlier.
    #[error("order feed already failed")]
    Closed,
}

enum Stage {
    Uninitialized,
    RolePending,
    QueryActive(OrderSubscription),
    Failed,
}

/// A role-aware, real-time view over the order collection.
pub struct OrderFeed {
    store: MemoryStore,
    resolver: RoleResolver,
    viewer: UserId,
    stage: Stage,
}

impl OrderFeed {
    #[must_use]
    pub fn new(store: MemoryStore, resolver: RoleResolver, viewer: UserId) -> Self {
        Self {
            store,
            resolver,
            viewer,
            stage: Stage::Uninitialized,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> FeedState {
        match self.stage {
            Stage::Uninitialized => FeedState::Uninitialized,
            Stage::RolePending => FeedState::RolePending,
            Stage::QueryActive(_) => FeedState::QueryActive,
            Stage::Failed => FeedState::Failed,
        }
    }

    /// The next result set.
    ///
    /// The first call resolves the viewer's role, opens the subscription
    /// over the role-appropriate scope, and returns its initial snapshot;
    /// later calls deliver one re-evaluated set per change.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Role`] when the role cannot be determined,
    /// [`FeedError::Store`] when the subscription terminates, and
    /// [`FeedError::Closed`] on any call after a failure.
    pub async fn next(&mut self) -> Result<Vec<Order>, FeedError> {
        loop {
            match &mut self.stage {
                Stage::Uninitialized | Stage::RolePending => {
                    self.stage = Stage::RolePending;
                    match self.resolver.resolve(&self.viewer).await {
                        Ok(level) => {
                            let caller = OwnerId::User(self.viewer.clone());
                            let scope = OrderDirectory::scope_for(level, &caller);
                            let subscription = self.store.subscribe_orders(scope);
                            self.stage = Stage::QueryActive(subscription);
                        }
                        Err(err) => {
                            self.stage = Stage::Failed;
                            return Err(err.into());
                        }
                    }
                }
                Stage::QueryActive(subscription) => match subscription.next().await {
                    Ok(orders) => return Ok(orders),
                    Err(err) => {
                        self.stage = Stage::Failed;
                        return Err(err.into());
                    }
                },
                Stage::Failed => return Err(FeedError::Closed),
            }
        }
    }
}
