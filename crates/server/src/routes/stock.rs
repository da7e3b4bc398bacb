//! Stock monitoring routes.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::models::Product;
use crate::state::AppState;

/// A product at or below its minimum stock level.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlert {
    #[serde(flatten)]
    pub product: Product,
    /// Units missing to get back to the minimum.
    pub shortfall: u32,
}

/// List every product whose stock is at or below its minimum.
///
/// GET /api/stock/low
pub async fn low_stock(State(state): State<AppState>) -> Json<Vec<LowStockAlert>> {
    let alerts = state
        .store()
        .low_stock_products()
        .await
        .into_iter()
        .map(|product| LowStockAlert {
            shortfall: product.shortfall(),
            product,
        })
        .collect();
    Json(alerts)
}
