//! # Menu Repository
//!
//! Database operations for menu items and their sub-item (add-on) edges.
//!
//! Menu items are outlet-agnostic and carry no price; pricing lives on the
//! outlet-menu bindings. The [`MenuRepository::displays_for`] lookup feeds
//! the order document display enrichment (live names/pictures on read).

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use warung_core::{MenuDisplay, MenuItem, MenuPatch, NewMenuItem};

const MENU_COLUMNS: &str = "id, sku, name, description, category, picture_url, \
                            is_subitem, is_deleted, created_at, updated_at";

/// Repository for menu database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Inserts a new menu item.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the SKU already exists.
    pub async fn insert(&self, new: &NewMenuItem) -> DbResult<MenuItem> {
        debug!(sku = %new.sku, "Inserting menu item");

        let now = Utc::now();
        let menu = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            INSERT INTO menus (sku, name, description, category, picture_url,
                               is_subitem, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)
            RETURNING {MENU_COLUMNS}
            "#
        ))
        .bind(&new.sku)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.picture_url)
        .bind(new.is_subitem)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(menu)
    }

    /// Gets an active menu item by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let menu = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menus WHERE id = ?1 AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(menu)
    }

    /// Gets an active menu item by SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<MenuItem>> {
        let menu = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_COLUMNS} FROM menus WHERE sku = ?1 AND is_deleted = 0"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(menu)
    }

    /// Lists active menu items, optionally filtered by category and/or the
    /// sub-item flag.
    pub async fn list(
        &self,
        category: Option<&str>,
        is_subitem: Option<bool>,
    ) -> DbResult<Vec<MenuItem>> {
        let menus = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            SELECT {MENU_COLUMNS} FROM menus
            WHERE is_deleted = 0
              AND (?1 IS NULL OR category = ?1)
              AND (?2 IS NULL OR is_subitem = ?2)
            ORDER BY name
            "#
        ))
        .bind(category)
        .bind(is_subitem)
        .fetch_all(&self.pool)
        .await?;

        Ok(menus)
    }

    /// Applies a partial update and returns the updated menu item.
    /// The SKU is immutable; create a new item for a new SKU.
    pub async fn update(&self, id: i64, patch: &MenuPatch) -> DbResult<MenuItem> {
        debug!(id = %id, "Updating menu item");

        let now = Utc::now();
        let mut qb = sqlx::QueryBuilder::new("UPDATE menus SET updated_at = ");
        qb.push_bind(now);
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(description) = &patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(category) = &patch.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(picture_url) = &patch.picture_url {
            qb.push(", picture_url = ").push_bind(picture_url);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND is_deleted = 0");

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Menu", id))
    }

    /// Soft-deletes a menu item. Existing order documents keep their
    /// snapshot; enriched reads simply stop resolving the name.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting menu item");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE menus SET is_deleted = 1, updated_at = ?2 WHERE id = ?1 AND is_deleted = 0",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu", id));
        }

        Ok(())
    }

    // =========================================================================
    // Sub-item Edges
    // =========================================================================

    /// Attaches a child menu item as an add-on of a parent.
    ///
    /// The relation is shallow (one level); nothing prevents chains in the
    /// schema but the read path never follows them.
    pub async fn add_subitem(&self, parent_id: i64, child_id: i64) -> DbResult<()> {
        debug!(parent_id = %parent_id, child_id = %child_id, "Attaching sub-item");

        let now = Utc::now();
        sqlx::query(
            "INSERT INTO menu_subitems (parent_id, child_id, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(parent_id)
        .bind(child_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Detaches a child from a parent.
    pub async fn remove_subitem(&self, parent_id: i64, child_id: i64) -> DbResult<()> {
        let result =
            sqlx::query("DELETE FROM menu_subitems WHERE parent_id = ?1 AND child_id = ?2")
                .bind(parent_id)
                .bind(child_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sub-item relation", parent_id));
        }

        Ok(())
    }

    /// Lists the active add-ons of a parent menu item. Soft-deleted
    /// children are filtered out.
    pub async fn subitems(&self, parent_id: i64) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            SELECT {cols} FROM menus m
            INNER JOIN menu_subitems ms ON ms.child_id = m.id
            WHERE ms.parent_id = ?1 AND m.is_deleted = 0
            ORDER BY m.name
            "#,
            cols = MENU_COLUMNS
                .split(", ")
                .map(|c| format!("m.{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Display Lookup
    // =========================================================================

    /// Batch lookup of display fields (name, picture) for the given menu
    /// ids. Used to enrich order documents on read; soft-deleted items are
    /// included so old orders can still show what was bought.
    pub async fn displays_for(&self, ids: &[i64]) -> DbResult<HashMap<i64, MenuDisplay>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb =
            sqlx::QueryBuilder::new("SELECT id, name, picture_url FROM menus WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let displays: Vec<MenuDisplay> = qb
            .build_query_as::<MenuDisplay>()
            .fetch_all(&self.pool)
            .await?;

        Ok(displays.into_iter().map(|d| (d.id, d)).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use warung_core::{MenuPatch, NewMenuItem};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn menu(sku: &str, name: &str, is_subitem: bool) -> NewMenuItem {
        NewMenuItem {
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            category: Some("mains".to_string()),
            picture_url: None,
            is_subitem,
        }
    }

    #[tokio::test]
    async fn test_insert_get_and_duplicate_sku() {
        let db = test_db().await;

        let item = db
            .menus()
            .insert(&menu("NASI-01", "Nasi Goreng", false))
            .await
            .unwrap();
        assert!(item.id > 0);

        let by_sku = db.menus().get_by_sku("NASI-01").await.unwrap().unwrap();
        assert_eq!(by_sku.id, item.id);

        let dup = db.menus().insert(&menu("NASI-01", "Other", false)).await;
        assert!(matches!(
            dup,
            Err(crate::error::DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = test_db().await;
        db.menus()
            .insert(&menu("NASI-01", "Nasi Goreng", false))
            .await
            .unwrap();
        let mut drink = menu("TEH-01", "Es Teh", false);
        drink.category = Some("drinks".to_string());
        db.menus().insert(&drink).await.unwrap();
        db.menus()
            .insert(&menu("TELUR-01", "Telur Mata Sapi", true))
            .await
            .unwrap();

        assert_eq!(db.menus().list(None, None).await.unwrap().len(), 3);
        assert_eq!(db.menus().list(Some("drinks"), None).await.unwrap().len(), 1);
        assert!(db
            .menus()
            .list(Some("desserts"), None)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(db.menus().list(None, Some(true)).await.unwrap().len(), 1);
        assert_eq!(db.menus().list(None, Some(false)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_patch() {
        let db = test_db().await;
        let item = db
            .menus()
            .insert(&menu("NASI-01", "Nasi Goreng", false))
            .await
            .unwrap();

        let updated = db
            .menus()
            .update(
                item.id,
                &MenuPatch {
                    name: Some("Nasi Goreng Spesial".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Nasi Goreng Spesial");
        assert_eq!(updated.sku, "NASI-01");
    }

    #[tokio::test]
    async fn test_subitem_edges_filter_deleted_children() {
        let db = test_db().await;
        let parent = db
            .menus()
            .insert(&menu("NASI-01", "Nasi Goreng", false))
            .await
            .unwrap();
        let egg = db
            .menus()
            .insert(&menu("TELUR-01", "Telur Mata Sapi", true))
            .await
            .unwrap();
        let krupuk = db
            .menus()
            .insert(&menu("KRUPUK-01", "Krupuk", true))
            .await
            .unwrap();

        db.menus().add_subitem(parent.id, egg.id).await.unwrap();
        db.menus().add_subitem(parent.id, krupuk.id).await.unwrap();

        assert_eq!(db.menus().subitems(parent.id).await.unwrap().len(), 2);

        db.menus().soft_delete(krupuk.id).await.unwrap();
        let remaining = db.menus().subitems(parent.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, egg.id);

        db.menus().remove_subitem(parent.id, egg.id).await.unwrap();
        assert!(db.menus().subitems(parent.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_displays_for_includes_deleted_items() {
        let db = test_db().await;
        let item = db
            .menus()
            .insert(&menu("NASI-01", "Nasi Goreng", false))
            .await
            .unwrap();
        db.menus().soft_delete(item.id).await.unwrap();

        let displays = db.menus().displays_for(&[item.id, 9999]).await.unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[&item.id].name, "Nasi Goreng");
    }
}
