//! # Order Repository
//!
//! Read paths and partial updates for placed orders.
//!
//! Order CREATION is not here: it is the transactional write path in
//! [`crate::checkout`]. This repository only ever sees committed rows.
//!
//! All reads decode the stored order-item document fail-soft: a corrupt
//! document never makes the row unreadable, it just comes back without
//! the decoded items.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::menu::MenuRepository;
use warung_core::{Order, OrderPatch, OrderView};

pub(crate) const ORDER_COLUMNS: &str =
    "id, uid, outlet_id, table_no, user_id, tax_rate, sc_rate, \
     subtotal, grand_total, order_item, created_at, updated_at";

/// Repository for order read and update operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by its internal id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<OrderView>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order.map(OrderView::from))
    }

    /// Gets an order by its external ULID.
    pub async fn get_by_uid(&self, uid: &str) -> DbResult<Option<OrderView>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE uid = ?1"
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order.map(OrderView::from))
    }

    /// Lists orders, newest first, optionally scoped to an outlet and/or a
    /// user.
    pub async fn list(
        &self,
        outlet_id: Option<i64>,
        user_id: Option<i64>,
    ) -> DbResult<Vec<OrderView>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE (?1 IS NULL OR outlet_id = ?1)
              AND (?2 IS NULL OR user_id = ?2)
            ORDER BY id DESC
            "#
        ))
        .bind(outlet_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders.into_iter().map(OrderView::from).collect())
    }

    /// Gets an order with its item document enriched with live menu
    /// display fields (current name and picture).
    ///
    /// Snapshot columns are returned untouched; only presentation fields
    /// come from the menus table. Items whose menu row no longer resolves
    /// keep `name: None`.
    pub async fn get_detailed(&self, id: i64) -> DbResult<Option<OrderView>> {
        let Some(mut view) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(doc) = view.order_item.as_mut() {
            let menus = MenuRepository::new(self.pool.clone());
            let displays = menus.displays_for(&doc.menu_ids()).await?;
            doc.enrich(&displays);
        }

        Ok(Some(view))
    }

    /// Applies a partial update and returns the updated order.
    ///
    /// This is an operator amendment surface; creation-time pricing rules
    /// are not re-run here.
    pub async fn update(&self, id: i64, patch: &OrderPatch) -> DbResult<OrderView> {
        debug!(id = %id, "Updating order");

        if patch.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Order", id));
        }

        let now = Utc::now();
        let mut qb = sqlx::QueryBuilder::new("UPDATE orders SET updated_at = ");
        qb.push_bind(now);
        if let Some(table_no) = &patch.table_no {
            qb.push(", table_no = ").push_bind(table_no);
        }
        if let Some(tax_rate) = patch.tax_rate {
            qb.push(", tax_rate = ").push_bind(tax_rate);
        }
        if let Some(sc_rate) = patch.sc_rate {
            qb.push(", sc_rate = ").push_bind(sc_rate);
        }
        if let Some(subtotal) = patch.subtotal {
            qb.push(", subtotal = ").push_bind(subtotal);
        }
        if let Some(grand_total) = patch.grand_total {
            qb.push(", grand_total = ").push_bind(grand_total);
        }
        if let Some(order_item) = &patch.order_item {
            qb.push(", order_item = ").push_bind(order_item);
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::pool::{Database, DbConfig};
    use warung_core::{MenuPatch, NewBinding, NewMenuItem, NewOrder, NewOutlet, OrderLine, OrderPatch};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds an outlet with one bound item and places a single order
    /// through the real checkout path. Returns (outlet_id, menu_id,
    /// order_id).
    async fn seed_with_order(db: &Database, user_id: i64) -> (i64, i64, i64) {
        let outlet = db
            .outlets()
            .insert(&NewOutlet {
                name: "Warung Pusat".to_string(),
                user_id: 1,
                tax_rate: 0.10,
                sc_rate: 0.05,
            })
            .await
            .unwrap();
        let menu = db
            .menus()
            .insert(&NewMenuItem {
                sku: "NASI-01".to_string(),
                name: "Nasi Goreng".to_string(),
                description: None,
                category: None,
                picture_url: None,
                is_subitem: false,
            })
            .await
            .unwrap();
        db.outlet_menus()
            .bind(&NewBinding {
                menu_id: menu.id,
                outlet_id: outlet.id,
                price: 25000,
                stock: None,
                is_selling: true,
            })
            .await
            .unwrap();

        let order = db
            .checkout()
            .place_order(&NewOrder {
                outlet_id: outlet.id,
                table_no: "A1".to_string(),
                user_id,
                lines: vec![OrderLine {
                    menu_id: menu.id,
                    quantity: 2,
                    additionals: vec![],
                }],
            })
            .await
            .unwrap();

        (outlet.id, menu.id, order.id)
    }

    #[tokio::test]
    async fn test_get_by_id_and_uid() {
        let db = test_db().await;
        let (_, _, order_id) = seed_with_order(&db, 7).await;

        let view = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(view.user_id, 7);
        assert!(view.order_item.is_some());

        let by_uid = db.orders().get_by_uid(&view.uid).await.unwrap().unwrap();
        assert_eq!(by_uid.id, order_id);

        assert!(db.orders().get_by_uid("no-such-uid").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = test_db().await;
        let (outlet_id, _, _) = seed_with_order(&db, 7).await;

        // A second order for a different user at the same outlet.
        let view = db.orders().list(Some(outlet_id), None).await.unwrap();
        let menu_id = view[0].order_item.as_ref().unwrap().items[0].menu_id;
        db.checkout()
            .place_order(&NewOrder {
                outlet_id,
                table_no: "B2".to_string(),
                user_id: 8,
                lines: vec![OrderLine {
                    menu_id,
                    quantity: 1,
                    additionals: vec![],
                }],
            })
            .await
            .unwrap();

        assert_eq!(db.orders().list(None, None).await.unwrap().len(), 2);
        assert_eq!(db.orders().list(Some(outlet_id), None).await.unwrap().len(), 2);
        assert_eq!(db.orders().list(None, Some(7)).await.unwrap().len(), 1);
        assert_eq!(
            db.orders().list(Some(outlet_id), Some(8)).await.unwrap().len(),
            1
        );
        assert!(db.orders().list(Some(9999), None).await.unwrap().is_empty());

        // Newest first.
        let all = db.orders().list(None, None).await.unwrap();
        assert!(all[0].id > all[1].id);
    }

    #[tokio::test]
    async fn test_update_patch() {
        let db = test_db().await;
        let (_, _, order_id) = seed_with_order(&db, 7).await;

        let updated = db
            .orders()
            .update(
                order_id,
                &OrderPatch {
                    table_no: Some("C3".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.table_no, "C3");

        // An empty patch is a no-op read.
        let unchanged = db
            .orders()
            .update(order_id, &OrderPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged.table_no, "C3");

        assert!(db
            .orders()
            .update(
                9999,
                &OrderPatch {
                    table_no: Some("D4".to_string()),
                    ..Default::default()
                }
            )
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_malformed_document_reads_fail_soft() {
        let db = test_db().await;
        let (outlet_id, _, _) = seed_with_order(&db, 7).await;

        // A row whose document predates the current format, inserted
        // directly.
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO orders (uid, outlet_id, table_no, user_id, tax_rate, sc_rate,
                                subtotal, grand_total, order_item, created_at, updated_at)
            VALUES ('01LEGACYROWLEGACYROWLEGACY', ?1, 'A9', 7, 0.1, 0.05,
                    10000, 11550, 'not json at all', ?2, ?2)
            "#,
        )
        .bind(outlet_id)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let legacy = db
            .orders()
            .get_by_uid("01LEGACYROWLEGACYROWLEGACY")
            .await
            .unwrap()
            .unwrap();
        assert!(legacy.order_item.is_none());
        assert_eq!(legacy.grand_total, 11550);

        // The bad row doesn't break listing either.
        assert_eq!(db.orders().list(None, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_detailed_read_reflects_menu_rename() {
        let db = test_db().await;
        let (_, menu_id, order_id) = seed_with_order(&db, 7).await;

        let detailed = db.orders().get_detailed(order_id).await.unwrap().unwrap();
        let doc = detailed.order_item.unwrap();
        assert_eq!(doc.items[0].name.as_deref(), Some("Nasi Goreng"));

        // Display fields come from the live menus table, not the snapshot.
        db.menus()
            .update(
                menu_id,
                &MenuPatch {
                    name: Some("Nasi Goreng Spesial".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let renamed = db.orders().get_detailed(order_id).await.unwrap().unwrap();
        let doc = renamed.order_item.unwrap();
        assert_eq!(doc.items[0].name.as_deref(), Some("Nasi Goreng Spesial"));

        // Pricing snapshot stays frozen.
        assert_eq!(renamed.subtotal, 50000);
        assert_eq!(renamed.grand_total, 57750);
    }
}
