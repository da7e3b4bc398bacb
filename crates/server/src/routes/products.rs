//! Product catalog routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rand::Rng;
use serde::Deserialize;
use stockvision_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::{ReorderError, ReorderSuggestion, SuggestionInput};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Search term matched against product names and barcodes.
    pub q: Option<String>,
}

/// List the catalog, optionally filtered by a search term.
///
/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Product>> {
    let mut products = state.store().products().await;
    if let Some(term) = params.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        products.retain(|p| p.matches(term));
    }
    Json(products)
}

/// Fetch a single product.
///
/// GET /api/products/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state
        .store()
        .product(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// Ask the suggestion service how many units to reorder.
///
/// POST /api/products/{id}/reorder-suggestion
///
/// Sales velocity and restock lead time are not tracked yet, so both are
/// sampled from the ranges the dashboard demo uses.
pub async fn reorder_suggestion(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ReorderSuggestion>> {
    let product = state
        .store()
        .product(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let client = state.reorder().ok_or(ReorderError::Disabled)?;

    let input = {
        let mut rng = rand::rng();
        SuggestionInput {
            product_name: product.name,
            current_stock: product.stock,
            stock_minimum: product.min_stock,
            average_sales_per_day: rng.random_range(2..=7),
            days_to_restock: rng.random_range(3..=10),
        }
    };

    let suggestion = client.suggest(&input).await?;
    Ok(Json(suggestion))
}
