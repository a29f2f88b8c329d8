//! Outlet-menu binding endpoints: per-outlet price, stock and selling
//! state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;
use crate::state::AppState;
use warung_core::validation::{validate_id, validate_price};
use warung_core::{BindingPatch, NewBinding, OutletMenu, OutletMenuListing};

/// `POST /outlet-menus` - binds a menu item to an outlet.
pub async fn bind(
    State(state): State<AppState>,
    Json(req): Json<NewBinding>,
) -> Result<(StatusCode, Json<OutletMenu>), ApiError> {
    validate_id("menu_id", req.menu_id)?;
    validate_id("outlet_id", req.outlet_id)?;
    validate_price(req.price)?;

    let binding = state.db.outlet_menus().bind(&req).await?;
    Ok((StatusCode::CREATED, Json(binding)))
}

/// `GET /outlets/{id}/menus` - an outlet's menu listing with display
/// fields.
pub async fn list_for_outlet(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<OutletMenuListing>>, ApiError> {
    let listings = state.db.outlet_menus().list_by_outlet(id).await?;
    Ok(Json(listings))
}

/// `GET /outlet-menus/{id}` - one binding.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OutletMenu>, ApiError> {
    let binding = state
        .db
        .outlet_menus()
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(binding))
}

/// `PUT /outlet-menus/{id}` - price/stock/selling update. A null stock
/// clears tracking back to unlimited.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<BindingPatch>,
) -> Result<Json<OutletMenu>, ApiError> {
    if let Some(price) = patch.price {
        validate_price(price)?;
    }

    let binding = state.db.outlet_menus().update(id, &patch).await?;
    Ok(Json(binding))
}

/// `DELETE /outlet-menus/{id}` - takes the item off the outlet's menu.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.outlet_menus().soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
