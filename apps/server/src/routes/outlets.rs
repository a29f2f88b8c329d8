//! Outlet management endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;
use crate::state::AppState;
use warung_core::validation::{validate_name, validate_rate};
use warung_core::{NewOutlet, Outlet, OutletPatch};

/// `POST /outlets` - creates an outlet.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewOutlet>,
) -> Result<(StatusCode, Json<Outlet>), ApiError> {
    validate_name(&req.name)?;
    validate_rate("tax_rate", req.tax_rate)?;
    validate_rate("sc_rate", req.sc_rate)?;

    let outlet = state.db.outlets().insert(&req).await?;
    Ok((StatusCode::CREATED, Json(outlet)))
}

/// `GET /outlets` - lists active outlets.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Outlet>>, ApiError> {
    let outlets = state.db.outlets().list().await?;
    Ok(Json(outlets))
}

/// `GET /outlets/{id}` - one outlet.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Outlet>, ApiError> {
    let outlet = state
        .db
        .outlets()
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(outlet))
}

/// `PUT /outlets/{id}` - partial update. Rate changes only affect future
/// orders.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<OutletPatch>,
) -> Result<Json<Outlet>, ApiError> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(tax_rate) = patch.tax_rate {
        validate_rate("tax_rate", tax_rate)?;
    }
    if let Some(sc_rate) = patch.sc_rate {
        validate_rate("sc_rate", sc_rate)?;
    }

    let outlet = state.db.outlets().update(id, &patch).await?;
    Ok(Json(outlet))
}

/// `DELETE /outlets/{id}` - soft delete.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.outlets().soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
