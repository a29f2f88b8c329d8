//! # Outlet-Menu Repository
//!
//! Database operations for the per-outlet price/stock bindings.
//!
//! A partial unique index (`ux_outlet_menus_active`) enforces at most one
//! ACTIVE binding per (menu, outlet) pair; soft-deleted rows don't count,
//! so an item can be re-bound after removal.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use warung_core::{BindingPatch, NewBinding, OutletMenu, OutletMenuListing};

const BINDING_COLUMNS: &str = "id, menu_id, outlet_id, price, stock, \
                               is_selling, is_deleted, created_at, updated_at";

/// Repository for outlet-menu binding operations.
#[derive(Debug, Clone)]
pub struct OutletMenuRepository {
    pool: SqlitePool,
}

impl OutletMenuRepository {
    /// Creates a new OutletMenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OutletMenuRepository { pool }
    }

    /// Binds a menu item to an outlet with a price and optional stock.
    ///
    /// ## Errors
    /// - `DbError::UniqueViolation` when an active binding for the pair
    ///   already exists
    /// - `DbError::ForeignKeyViolation` when the menu or outlet id does
    ///   not exist
    pub async fn bind(&self, new: &NewBinding) -> DbResult<OutletMenu> {
        debug!(
            menu_id = %new.menu_id,
            outlet_id = %new.outlet_id,
            price = %new.price,
            "Binding menu to outlet"
        );

        let now = Utc::now();
        let binding = sqlx::query_as::<_, OutletMenu>(&format!(
            r#"
            INSERT INTO outlet_menus (menu_id, outlet_id, price, stock,
                                      is_selling, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)
            RETURNING {BINDING_COLUMNS}
            "#
        ))
        .bind(new.menu_id)
        .bind(new.outlet_id)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.is_selling)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(binding)
    }

    /// Gets an active binding by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<OutletMenu>> {
        let binding = sqlx::query_as::<_, OutletMenu>(&format!(
            "SELECT {BINDING_COLUMNS} FROM outlet_menus WHERE id = ?1 AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(binding)
    }

    /// Gets the active binding for a (menu, outlet) pair, if any.
    pub async fn get_active(&self, menu_id: i64, outlet_id: i64) -> DbResult<Option<OutletMenu>> {
        let binding = sqlx::query_as::<_, OutletMenu>(&format!(
            r#"
            SELECT {BINDING_COLUMNS} FROM outlet_menus
            WHERE menu_id = ?1 AND outlet_id = ?2 AND is_deleted = 0
            "#
        ))
        .bind(menu_id)
        .bind(outlet_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(binding)
    }

    /// Lists an outlet's active bindings joined with menu display fields,
    /// for the customer-facing menu screen.
    pub async fn list_by_outlet(&self, outlet_id: i64) -> DbResult<Vec<OutletMenuListing>> {
        let listings = sqlx::query_as::<_, OutletMenuListing>(
            r#"
            SELECT om.id, om.menu_id, om.outlet_id, om.price, om.stock, om.is_selling,
                   m.sku AS menu_sku, m.name AS menu_name, m.picture_url AS menu_picture_url
            FROM outlet_menus om
            INNER JOIN menus m ON m.id = om.menu_id
            WHERE om.outlet_id = ?1 AND om.is_deleted = 0 AND m.is_deleted = 0
            ORDER BY m.name
            "#,
        )
        .bind(outlet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Applies a partial update to a binding and returns the result.
    ///
    /// `patch.stock = Some(None)` clears stock tracking back to unlimited;
    /// `patch.stock = None` leaves the column untouched.
    pub async fn update(&self, id: i64, patch: &BindingPatch) -> DbResult<OutletMenu> {
        debug!(id = %id, "Updating outlet-menu binding");

        let now = Utc::now();
        let mut qb = sqlx::QueryBuilder::new("UPDATE outlet_menus SET updated_at = ");
        qb.push_bind(now);
        if let Some(price) = patch.price {
            qb.push(", price = ").push_bind(price);
        }
        if let Some(stock) = patch.stock {
            qb.push(", stock = ").push_bind(stock);
        }
        if let Some(is_selling) = patch.is_selling {
            qb.push(", is_selling = ").push_bind(is_selling);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND is_deleted = 0");

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Outlet menu", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Outlet menu", id))
    }

    /// Soft-deletes a binding, taking the item off the outlet's menu.
    /// The (menu, outlet) pair can be bound again afterwards.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting outlet-menu binding");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE outlet_menus SET is_deleted = 1, updated_at = ?2 WHERE id = ?1 AND is_deleted = 0",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Outlet menu", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
