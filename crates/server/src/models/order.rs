//! Order documents.
//!
//! An order is written exactly once, by the checkout transaction, into one
//! partition of the order collection. Line items snapshot the product name
//! and unit price at sale time, so historical orders are decoupled from
//! future catalog changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockvision_core::{OrderId, OrderStatus, OwnerId, Price, ProductId};

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Product name at sale time.
    pub name: String,
    pub quantity: u32,
    /// Unit price at sale time, immutable thereafter.
    pub unit_price: Price,
}

impl OrderLine {
    /// `quantity × unit price`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// A committed order document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owning partition key; the anonymous sentinel for walk-in sales.
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    /// Assigned by the store when the transaction commits.
    pub created_at: DateTime<Utc>,
}

/// An order about to be written by a checkout transaction.
///
/// Carries no id or timestamp; the store assigns both at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub owner: OwnerId,
    pub items: Vec<OrderLine>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Build a paid order from its line items.
    ///
    /// The total is computed from the lines here, so a stored order's total
    /// is internally consistent by construction.
    #[must_use]
    pub fn paid(owner: OwnerId, items: Vec<OrderLine>) -> Self {
        let total_amount = items.iter().map(OrderLine::subtotal).sum();
        Self {
            owner,
            items,
            total_amount,
            status: OrderStatus::Paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn line(quantity: u32, unit_price: Decimal) -> OrderLine {
        OrderLine {
            product_id: ProductId::new("prod_10"),
            name: "Agua Mineral".to_owned(),
            quantity,
            unit_price: Price::new(unit_price),
        }
    }

    #[test]
    fn total_equals_sum_of_line_subtotals() {
        let order = NewOrder::paid(OwnerId::PosSale, vec![line(2, dec!(100.00)), line(3, dec!(150.00))]);
        assert_eq!(order.total_amount, dec!(650.00));
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[test]
    fn owner_serializes_as_user_id_field() {
        let order = Order {
            id: OrderId::new("ord_1"),
            owner: OwnerId::PosSale,
            items: vec![line(2, dec!(100.00))],
            total_amount: dec!(200.00),
            status: OrderStatus::Paid,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&order).expect("serialize");
        assert_eq!(json["userId"], "anonymous_pos_sale");
        assert_eq!(json["status"], "paid");
        assert!(json.get("totalAmount").is_some());
    }
}
