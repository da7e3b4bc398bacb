//! Point-of-sale checkout over the HTTP surface.
//!
//! Covers the happy path, every rejection class, and the no-partial-effects
//! guarantee when one line of a multi-line sale cannot be satisfied.

use axum::http::StatusCode;
use serde_json::Value;

use stockvision_integration_tests::{TestContext, checkout_body, line};

#[tokio::test]
async fn health_endpoints_respond() {
    let ctx = TestContext::seeded().await;

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_owned()));

    let (status, _) = ctx.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn anonymous_checkout_decrements_stock_and_returns_a_receipt() {
    let ctx = TestContext::seeded().await;

    // Agua Mineral: 120 in stock at $100.00
    let (status, receipt) = ctx
        .post_json("/api/pos/checkout", checkout_body(&[line("prod_10", 2)]))
        .await;
    assert_eq!(status, StatusCode::OK, "unexpected response: {receipt}");
    assert_eq!(receipt["total"], "200.00");
    assert_eq!(receipt["status"], "paid");
    assert!(
        !receipt["orderId"].as_str().expect("order id").is_empty(),
        "receipt must carry the new order id"
    );

    let (status, product) = ctx.get("/api/products/prod_10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["stock"], 118);
}

#[tokio::test]
async fn oversold_line_rejects_the_whole_sale() {
    let ctx = TestContext::seeded().await;

    // Leche Entera has 5 units; the cola line alone would be satisfiable.
    let (status, body) = ctx
        .post_json(
            "/api/pos/checkout",
            checkout_body(&[line("prod_1", 2), line("prod_4", 10)]),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "unexpected response: {body}");

    // Neither line left any trace.
    let (_, cola) = ctx.get("/api/products/prod_1").await;
    assert_eq!(cola["stock"], 80);
    let (_, milk) = ctx.get("/api/products/prod_4").await;
    assert_eq!(milk["stock"], 5);
}

#[tokio::test]
async fn zero_quantity_lines_are_a_bad_request() {
    let ctx = TestContext::seeded().await;
    let (status, _) = ctx
        .post_json("/api/pos/checkout", checkout_body(&[line("prod_1", 0)]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_products_are_not_found() {
    let ctx = TestContext::seeded().await;
    let (status, _) = ctx
        .post_json("/api/pos/checkout", checkout_body(&[line("prod_99", 1)]))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_sales_are_a_bad_request() {
    let ctx = TestContext::seeded().await;
    let (status, _) = ctx.post_json("/api/pos/checkout", checkout_body(&[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_search_filters_by_name_and_code() {
    let ctx = TestContext::seeded().await;

    let (status, all) = ctx.get("/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().expect("array").len(), 10);

    let (_, by_name) = ctx.get("/api/products?q=leche").await;
    let by_name = by_name.as_array().expect("array");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0]["name"], "Leche Entera");

    let (_, by_code) = ctx.get("/api/products?q=77901010").await;
    let by_code = by_code.as_array().expect("array");
    assert_eq!(by_code.len(), 1);
    assert_eq!(by_code[0]["name"], "Agua Mineral");
}

#[tokio::test]
async fn low_stock_report_lists_shortfalls() {
    let ctx = TestContext::seeded().await;

    let (status, alerts) = ctx.get("/api/stock/low").await;
    assert_eq!(status, StatusCode::OK);

    let alerts = alerts.as_array().expect("array");
    let milk = alerts
        .iter()
        .find(|a| a["name"] == "Leche Entera")
        .expect("Leche Entera is under its minimum");
    assert_eq!(milk["shortfall"], 5);
    assert!(
        alerts.iter().all(|a| a["name"] != "Agua Mineral"),
        "well-stocked products must not alert"
    );
}

#[tokio::test]
async fn reorder_suggestions_require_configuration() {
    let ctx = TestContext::seeded().await;
    let (status, _) = ctx
        .post_json("/api/products/prod_4/reorder-suggestion", Value::Null)
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
