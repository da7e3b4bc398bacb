//! Order-partition owner identity.
//!
//! Every order lives in exactly one partition of the order collection:
//! either the partition of the user who placed it, or the shared anonymous
//! partition used for walk-in point-of-sale sales. An order is never moved
//! between partitions.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Sentinel partition key for anonymous point-of-sale sales.
pub const ANONYMOUS_POS_SALE: &str = "anonymous_pos_sale";

/// The owner of an order partition.
///
/// Serialized as the raw partition key so stored orders carry the same
/// `userId` shape whether they belong to a registered user or to the
/// anonymous point-of-sale partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum OwnerId {
    /// A registered user's partition.
    User(UserId),
    /// The shared anonymous partition for walk-in point-of-sale sales.
    PosSale,
}

impl OwnerId {
    /// Partition key as stored in order documents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(user) => user.as_str(),
            Self::PosSale => ANONYMOUS_POS_SALE,
        }
    }

    /// Whether this is the anonymous point-of-sale partition.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::PosSale)
    }
}

impl From<UserId> for OwnerId {
    fn from(user: UserId) -> Self {
        Self::User(user)
    }
}

impl From<String> for OwnerId {
    fn from(raw: String) -> Self {
        if raw == ANONYMOUS_POS_SALE {
            Self::PosSale
        } else {
            Self::User(UserId::new(raw))
        }
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> Self {
        owner.as_str().to_owned()
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
