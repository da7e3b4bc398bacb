//! Status and role enums.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a status or role from its stored string form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Lifecycle status of an order.
///
/// Point-of-sale checkouts create orders directly in `Paid`; the remaining
/// transitions belong to fulfillment flows outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError {
                kind: "order status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Role stored on a user profile document.
///
/// Only `Admin` grants elevated data access; every other value (and an
/// absent profile) is treated as a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including cross-partition order queries.
    Admin,
    /// Store staff operating the point of sale.
    Seller,
    /// Registered customer.
    Cliente,
}

impl UserRole {
    /// Whether this role carries administrator privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
            Self::Cliente => "cliente",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "seller" => Ok(Self::Seller),
            "cliente" => Ok(Self::Cliente),
            _ => Err(ParseEnumError {
                kind: "user role",
                value: s.to_owned(),
            }),
        }
    }
}
