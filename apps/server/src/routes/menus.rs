//! Menu item endpoints, including sub-item (add-on) edges.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;
use warung_core::validation::{validate_name, validate_sku};
use warung_core::{MenuItem, MenuPatch, NewMenuItem};

#[derive(Debug, Deserialize)]
pub struct MenuFilter {
    pub category: Option<String>,
    pub is_subitem: Option<bool>,
}

/// `POST /menus` - creates a menu item.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    validate_sku(&req.sku)?;
    validate_name(&req.name)?;

    let menu = state.db.menus().insert(&req).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

/// `GET /menus` - lists active menu items, optionally by category and/or
/// sub-item flag.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<MenuFilter>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let menus = state
        .db
        .menus()
        .list(filter.category.as_deref(), filter.is_subitem)
        .await?;
    Ok(Json(menus))
}

/// `GET /menus/{id}` - one menu item.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MenuItem>, ApiError> {
    let menu = state
        .db
        .menus()
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(menu))
}

/// `PUT /menus/{id}` - partial update (SKU is immutable).
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<MenuPatch>,
) -> Result<Json<MenuItem>, ApiError> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }

    let menu = state.db.menus().update(id, &patch).await?;
    Ok(Json(menu))
}

/// `DELETE /menus/{id}` - soft delete.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.menus().soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /menus/{id}/subitems` - active add-ons of a menu item.
pub async fn list_subitems(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = state.db.menus().subitems(id).await?;
    Ok(Json(items))
}

/// `POST /menus/{id}/subitems/{child_id}` - attaches an add-on.
pub async fn attach_subitem(
    State(state): State<AppState>,
    Path((id, child_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.db.menus().add_subitem(id, child_id).await?;
    Ok(StatusCode::CREATED)
}

/// `DELETE /menus/{id}/subitems/{child_id}` - detaches an add-on.
pub async fn detach_subitem(
    State(state): State<AppState>,
    Path((id, child_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.db.menus().remove_subitem(id, child_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
