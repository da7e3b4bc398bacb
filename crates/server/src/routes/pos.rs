//! Point-of-sale routes.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockvision_core::{OrderId, OrderStatus, OwnerId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::models::Cart;
use crate::state::AppState;

/// A requested sale, one line per distinct product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub lines: Vec<CheckoutLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Receipt returned for a committed sale.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub total: Decimal,
    pub status: OrderStatus,
}

/// Finalize a sale: decrement stock and record a paid order, atomically.
///
/// POST /api/pos/checkout
///
/// Sales rung up without a caller identity are recorded against the shared
/// anonymous walk-in owner.
pub async fn checkout(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let mut cart = Cart::default();
    for line in &request.lines {
        if line.quantity == 0 {
            return Err(AppError::BadRequest(format!(
                "quantity for product {} must be at least 1",
                line.product_id
            )));
        }
        let product = state
            .store()
            .product(&line.product_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("product {}", line.product_id)))?;
        cart.insert(product, line.quantity)?;
    }

    let acting = user.map_or(OwnerId::PosSale, OwnerId::User);
    let receipt = state.checkout().finalize_sale(&cart, &acting).await?;

    Ok(Json(CheckoutResponse {
        order_id: receipt.order_id,
        total: receipt.total,
        status: OrderStatus::Paid,
    }))
}
