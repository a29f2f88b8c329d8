//! # Outlet Repository
//!
//! Database operations for outlets (restaurant branches).
//!
//! Outlets carry the per-branch tax and service-charge rates; the checkout
//! transaction reads those rates itself, inside its own transaction, so
//! this repository only serves the management surface.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use warung_core::{NewOutlet, Outlet, OutletPatch};

const OUTLET_COLUMNS: &str =
    "id, name, user_id, tax_rate, sc_rate, is_deleted, created_at, updated_at";

/// Repository for outlet database operations.
#[derive(Debug, Clone)]
pub struct OutletRepository {
    pool: SqlitePool,
}

impl OutletRepository {
    /// Creates a new OutletRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OutletRepository { pool }
    }

    /// Inserts a new outlet.
    pub async fn insert(&self, new: &NewOutlet) -> DbResult<Outlet> {
        debug!(name = %new.name, "Inserting outlet");

        let now = Utc::now();
        let outlet = sqlx::query_as::<_, Outlet>(&format!(
            r#"
            INSERT INTO outlets (name, user_id, tax_rate, sc_rate, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
            RETURNING {OUTLET_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(new.user_id)
        .bind(new.tax_rate)
        .bind(new.sc_rate)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(outlet)
    }

    /// Gets an active (non-deleted) outlet by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Outlet>> {
        let outlet = sqlx::query_as::<_, Outlet>(&format!(
            "SELECT {OUTLET_COLUMNS} FROM outlets WHERE id = ?1 AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(outlet)
    }

    /// Lists active outlets, newest first.
    pub async fn list(&self) -> DbResult<Vec<Outlet>> {
        let outlets = sqlx::query_as::<_, Outlet>(&format!(
            "SELECT {OUTLET_COLUMNS} FROM outlets WHERE is_deleted = 0 ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(outlets)
    }

    /// Applies a partial update and returns the updated outlet.
    ///
    /// Rate changes only affect FUTURE orders; placed orders keep their
    /// snapshot.
    pub async fn update(&self, id: i64, patch: &OutletPatch) -> DbResult<Outlet> {
        debug!(id = %id, "Updating outlet");

        let now = Utc::now();
        let mut qb = sqlx::QueryBuilder::new("UPDATE outlets SET updated_at = ");
        qb.push_bind(now);
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(tax_rate) = patch.tax_rate {
            qb.push(", tax_rate = ").push_bind(tax_rate);
        }
        if let Some(sc_rate) = patch.sc_rate {
            qb.push(", sc_rate = ").push_bind(sc_rate);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND is_deleted = 0");

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Outlet", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Outlet", id))
    }

    /// Soft-deletes an outlet. History (orders) keeps referencing it.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting outlet");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE outlets SET is_deleted = 1, updated_at = ?2 WHERE id = ?1 AND is_deleted = 0",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Outlet", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use warung_core::{NewOutlet, OutletPatch};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_outlet() -> NewOutlet {
        NewOutlet {
            name: "Warung Pusat".to_string(),
            user_id: 1,
            tax_rate: 0.10,
            sc_rate: 0.05,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;

        let outlet = db.outlets().insert(&sample_outlet()).await.unwrap();
        assert!(outlet.id > 0);
        assert_eq!(outlet.tax_rate, 0.10);
        assert!(!outlet.is_deleted);

        let fetched = db.outlets().get_by_id(outlet.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Warung Pusat");
    }

    #[tokio::test]
    async fn test_update_rates() {
        let db = test_db().await;
        let outlet = db.outlets().insert(&sample_outlet()).await.unwrap();

        let updated = db
            .outlets()
            .update(
                outlet.id,
                &OutletPatch {
                    tax_rate: Some(0.11),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.tax_rate, 0.11);
        assert_eq!(updated.sc_rate, 0.05);
        assert_eq!(updated.name, "Warung Pusat");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_outlet() {
        let db = test_db().await;
        let outlet = db.outlets().insert(&sample_outlet()).await.unwrap();

        db.outlets().soft_delete(outlet.id).await.unwrap();

        assert!(db.outlets().get_by_id(outlet.id).await.unwrap().is_none());
        assert!(db.outlets().list().await.unwrap().is_empty());

        // Deleting twice reports not found.
        assert!(db.outlets().soft_delete(outlet.id).await.is_err());
    }
}
