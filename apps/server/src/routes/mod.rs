//! # HTTP Routes
//!
//! Route assembly for the ordering API. Handlers are thin: deserialize,
//! validate, call into `warung-db`, map the result.
//!
//! ## Surface
//! ```text
//! POST   /orders                          place an order (the checkout path)
//! GET    /orders?outlet_id=&user_id=      list orders
//! GET    /orders/{id}                     one order, display-enriched
//! GET    /orders/uid/{uid}                lookup by external ULID
//! PUT    /orders/{id}                     operator amendment
//!
//! POST   /outlets                         create outlet
//! GET    /outlets                         list outlets
//! GET    /outlets/{id}                    one outlet
//! PUT    /outlets/{id}                    update outlet
//! DELETE /outlets/{id}                    soft-delete outlet
//! GET    /outlets/{id}/menus              the outlet's menu listing
//!
//! POST   /menus                           create menu item
//! GET    /menus?category=                 list menu items
//! GET    /menus/{id}                      one menu item
//! PUT    /menus/{id}                      update menu item
//! DELETE /menus/{id}                      soft-delete menu item
//! GET    /menus/{id}/subitems             list add-ons
//! POST   /menus/{id}/subitems/{child_id}  attach add-on
//! DELETE /menus/{id}/subitems/{child_id}  detach add-on
//!
//! POST   /outlet-menus                    bind menu to outlet
//! GET    /outlet-menus/{id}               one binding
//! PUT    /outlet-menus/{id}               update price/stock/selling
//! DELETE /outlet-menus/{id}               soft-delete binding
//!
//! GET    /health                          liveness probe
//! ```

pub mod menus;
pub mod orders;
pub mod outlet_menus;
pub mod outlets;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Orders
        .route("/orders", post(orders::create).get(orders::list))
        .route("/orders/{id}", get(orders::get).put(orders::update))
        .route("/orders/uid/{uid}", get(orders::get_by_uid))
        // Outlets
        .route("/outlets", post(outlets::create).get(outlets::list))
        .route(
            "/outlets/{id}",
            get(outlets::get).put(outlets::update).delete(outlets::remove),
        )
        .route("/outlets/{id}/menus", get(outlet_menus::list_for_outlet))
        // Menus
        .route("/menus", post(menus::create).get(menus::list))
        .route(
            "/menus/{id}",
            get(menus::get).put(menus::update).delete(menus::remove),
        )
        .route("/menus/{id}/subitems", get(menus::list_subitems))
        .route(
            "/menus/{id}/subitems/{child_id}",
            post(menus::attach_subitem).delete(menus::detach_subitem),
        )
        // Outlet-menu bindings
        .route("/outlet-menus", post(outlet_menus::bind))
        .route(
            "/outlet-menus/{id}",
            get(outlet_menus::get)
                .put(outlet_menus::update)
                .delete(outlet_menus::remove),
        )
        // Liveness
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: verifies the database answers.
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<&'static str, StatusCode> {
    if state.db.health_check().await {
        Ok("ok")
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

// =============================================================================
// Route Tests
// =============================================================================
