//! Order endpoints.
//!
//! `create` is the only write path that touches stock; everything it does
//! happens inside the checkout transaction in `warung-db`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;
use warung_core::{NewOrder, Order, OrderPatch, OrderView};

/// Optional list filters.
#[derive(Debug, Deserialize)]
pub struct OrderFilter {
    pub outlet_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// `POST /orders` - places an order.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.db.checkout().place_order(&req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders` - lists orders, optionally filtered by outlet and/or user.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let orders = state
        .db
        .orders()
        .list(filter.outlet_id, filter.user_id)
        .await?;
    Ok(Json(orders))
}

/// `GET /orders/{id}` - one order with display-enriched item document.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderView>, ApiError> {
    let order = state
        .db
        .orders()
        .get_detailed(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(order))
}

/// `GET /orders/uid/{uid}` - lookup by external ULID.
pub async fn get_by_uid(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    let order = state
        .db
        .orders()
        .get_by_uid(&uid)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(order))
}

/// `PUT /orders/{id}` - operator amendment of a placed order.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<OrderView>, ApiError> {
    let order = state.db.orders().update(id, &patch).await?;
    Ok(Json(order))
}
