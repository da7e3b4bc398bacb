//! Product catalog document.

use serde::{Deserialize, Serialize};

use stockvision_core::{Price, ProductId};

/// A sellable product.
///
/// `stock` is the only field mutated after creation, and only ever inside a
/// checkout transaction; it never goes below zero in a committed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// Barcode, used by the point-of-sale scanner search.
    pub code: String,
    pub name: String,
    pub category: String,
    pub price: Price,
    /// Sellable units currently available.
    pub stock: u32,
    /// Threshold below which the product shows up in low-stock alerts.
    pub min_stock: u32,
    pub provider: String,
    pub image_url: String,
}

impl Product {
    /// Whether the product is at or below its minimum stock level.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Units missing to get back to the minimum stock level.
    #[must_use]
    pub const fn shortfall(&self) -> u32 {
        self.min_stock.saturating_sub(self.stock)
    }

    /// Case-insensitive name match or exact-prefix code match, the same
    /// filter the point-of-sale search box applies.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase()) || self.code.contains(term)
    }
}
