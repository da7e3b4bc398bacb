//! The client-held point-of-sale cart.
//!
//! Carts are ephemeral: they exist only for the duration of a checkout
//! session and have no persisted identity. Every line carries a product
//! snapshot and a positive quantity bounded by the stock last observed;
//! dropping a quantity to zero removes the line.

use rust_decimal::Decimal;
use thiserror::Error;

use stockvision_core::ProductId;

use super::product::Product;

/// One product plus quantity in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Snapshot of the product as last observed by the client.
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// `quantity × unit price` for this line.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// Errors adjusting the cart against last-observed stock.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product has no sellable units at all.
    #[error("{name} is not available")]
    OutOfStock { name: String },

    /// The requested quantity exceeds the observed stock.
    #[error("only {available} units of {name} available")]
    StockLimit { name: String, available: u32 },
}

/// An ordered collection of cart lines, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add one unit of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] for a product with zero stock, or
    /// [`CartError::StockLimit`] when the line already holds every observed
    /// unit.
    pub fn add(&mut self, product: Product) -> Result<(), CartError> {
        if product.stock == 0 {
            return Err(CartError::OutOfStock { name: product.name });
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            if line.quantity >= product.stock {
                return Err(CartError::StockLimit {
                    name: product.name,
                    available: product.stock,
                });
            }
            line.quantity += 1;
            line.product = product;
        } else {
            self.lines.push(CartLine {
                product,
                quantity: 1,
            });
        }
        Ok(())
    }

    /// Insert a line with an explicit quantity, replacing any existing line
    /// for the same product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] for a product with zero stock, or
    /// [`CartError::StockLimit`] when `quantity` exceeds the observed stock.
    pub fn insert(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if product.stock == 0 {
            return Err(CartError::OutOfStock { name: product.name });
        }
        if quantity > product.stock {
            return Err(CartError::StockLimit {
                name: product.name,
                available: product.stock,
            });
        }
        self.remove(&product.id.clone());
        if quantity > 0 {
            self.lines.push(CartLine { product, quantity });
        }
        Ok(())
    }

    /// Set the quantity of an existing line, clamping to the observed stock.
    /// A quantity of zero removes the line. Unknown products are ignored.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        let Some(index) = self.lines.iter().position(|l| &l.product.id == product_id) else {
            return;
        };
        if quantity == 0 {
            self.lines.remove(index);
            return;
        }
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity.min(line.product.stock);
        }
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.lines.retain(|l| &l.product.id != product_id);
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
