//! Order routes.
//!
//! All three endpoints require a caller identity; the caller's access level
//! is re-resolved on every request, so a role change takes effect on the
//! next call.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use stockvision_core::{OrderId, OwnerId};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Order;
use crate::services::OrderFeed;
use crate::state::AppState;

/// List the orders visible to the caller, newest first.
///
/// GET /api/orders
///
/// Admins see every partition, including anonymous walk-in sales; everyone
/// else sees only their own.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let caller = OwnerId::User(user.clone());
    let level = state.roles().resolve(&user).await?;
    Ok(Json(state.orders().list_orders(level, &caller).await))
}

/// Fetch a single order.
///
/// GET /api/orders/{id}
///
/// Responds `404` both for orders that do not exist and for orders outside
/// the caller's partition; the two cases are indistinguishable on purpose.
pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let caller = OwnerId::User(user.clone());
    let level = state.roles().resolve(&user).await?;
    let order = state
        .orders()
        .fetch_order(level, &caller, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found or not permitted".to_owned()))?;
    Ok(Json(order))
}

/// Stream the caller's order view as server-sent events.
///
/// GET /api/orders/feed
///
/// Each `orders` event carries the full re-evaluated result set. A terminal
/// `error` event is sent when the feed fails; clients reconnect to recover.
pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let feed = OrderFeed::new(state.store().clone(), state.roles().clone(), user);

    let stream = stream::unfold(Some(feed), |feed| async move {
        let mut feed = feed?;
        match feed.next().await {
            Ok(orders) => match Event::default().event("orders").json_data(&orders) {
                Ok(event) => Some((Ok(event), Some(feed))),
                Err(err) => Some((Ok(error_event(&err.to_string())), None)),
            },
            Err(err) => Some((Ok(error_event(&err.to_string())), None)),
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn error_event(message: &str) -> Event {
    Event::default().event("error").data(message)
}
