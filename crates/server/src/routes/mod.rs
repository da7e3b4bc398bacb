//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check
//!
//! # Catalog
//! GET  /api/products                    - Product listing (?q= filters)
//! GET  /api/products/{id}               - Product detail
//! POST /api/products/{id}/reorder-suggestion - AI reorder suggestion
//!
//! # Stock
//! GET  /api/stock/low                   - Low-stock alerts
//!
//! # Point of sale
//! POST /api/pos/checkout                - Finalize a sale
//!
//! # Orders (identity via x-user-id)
//! GET  /api/orders                      - Orders visible to the caller
//! GET  /api/orders/{id}                 - Order detail
//! GET  /api/orders/feed                 - Live order feed (SSE)
//! ```

pub mod orders;
pub mod pos;
pub mod products;
pub mod stock;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::detail))
        .route(
            "/api/products/{id}/reorder-suggestion",
            post(products::reorder_suggestion),
        )
        .route("/api/stock/low", get(stock::low_stock))
        .route("/api/pos/checkout", post(pos::checkout))
        .route("/api/orders", get(orders::list))
        .route("/api/orders/feed", get(orders::feed))
        .route("/api/orders/{id}", get(orders::detail))
}
