//! Role resolution.
//!
//! Privileges are derived from the user's profile document, never cached
//! beyond a single resolution cycle: callers resolve once per acting
//! identity and must not issue role-dependent queries while resolution is
//! still in flight. A missing profile or any role other than the
//! administrator marker resolves to a regular user. A failed lookup is a
//! distinct "cannot determine access" outcome and never grants elevated
//! access.

use thiserror::Error;
use tracing::instrument;

use stockvision_core::UserId;

use crate::store::{MemoryStore, StoreError};

/// Privileges attached to a resolved identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// May read orders across every partition.
    Admin,
    /// May read only their own partition.
    Standard,
}

impl AccessLevel {
    /// Whether this level carries administrator privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Role resolution failed; access cannot be determined.
#[derive(Debug, Error)]
pub enum RoleError {
    #[error("cannot determine access: {0}")]
    Lookup(#[from] StoreError),
}

/// Resolves an identity's access level from its profile document.
#[derive(Clone)]
pub struct RoleResolver {
    store: MemoryStore,
}

impl RoleResolver {
    #[must_use]
    pub const fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Resolve the access level for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::Lookup`] when the profile cannot be read. The
    /// caller must treat that as "cannot determine access", never as admin.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn resolve(&self, user: &UserId) -> Result<AccessLevel, RoleError> {
        let level = match self.store.profile(user).await? {
            Some(profile) if profile.role.is_admin() => AccessLevel::Admin,
            _ => AccessLevel::Standard,
        };
        tracing::debug!(is_admin = level.is_admin(), "role resolved");
        Ok(level)
    }
}
