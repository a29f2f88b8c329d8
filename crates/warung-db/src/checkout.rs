//! # Order Checkout
//!
//! The single transactional write path that turns an order request into a
//! persisted order row.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Transaction                               │
//! │                                                                         │
//! │  validate request (no DB work)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    load outlet rates (active outlets only)                             │
//! │    for each line / add-on:                                             │
//! │      resolve active binding  ──missing──► MenuUnavailable              │
//! │      tracked stock < qty     ──────────► InsufficientStock             │
//! │      tracked stock: guarded decrement  ─► Conflict on lost race        │
//! │    compute breakdown, build + encode item document                     │
//! │    INSERT order row (fresh ULID)                                       │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure before COMMIT rolls everything back: no order row, no     │
//! │  stock movement. Partial effects never escape.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conflict Retries
//! Under WAL a concurrent committed write can invalidate this
//! transaction's snapshot, surfacing as a busy error. Those are mapped to
//! [`OrderError::Conflict`] and retried here with a short backoff, a
//! bounded number of times; the caller only ever sees `Conflict` once the
//! budget is exhausted.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::error::{DbError, OrderError};
use crate::repository::order::ORDER_COLUMNS;
use warung_core::order_item::{OrderItemAdditional, OrderItemDoc, OrderItemLine, OrderSummary};
use warung_core::pricing::{compute, PricedLine};
use warung_core::validation::validate_new_order;
use warung_core::{NewOrder, Order};

/// How many times a conflicted checkout is retried before giving up.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Base backoff between conflict retries; scaled linearly per attempt.
const RETRY_BACKOFF_MS: u64 = 25;

/// The outlet rate snapshot read inside the transaction.
#[derive(sqlx::FromRow)]
struct OutletRates {
    tax_rate: f64,
    sc_rate: f64,
}

/// The active binding row for one requested line.
#[derive(sqlx::FromRow)]
struct BindingRow {
    id: i64,
    price: i64,
    stock: Option<i64>,
}

/// Coordinator for the order placement transaction.
#[derive(Debug, Clone)]
pub struct Checkout {
    pool: SqlitePool,
}

impl Checkout {
    /// Creates a new checkout coordinator.
    pub fn new(pool: SqlitePool) -> Self {
        Checkout { pool }
    }

    /// Places an order: validates, prices and persists it in one
    /// transaction, retrying on write conflicts.
    ///
    /// ## Errors
    /// - [`OrderError::InvalidInput`] - malformed request, nothing touched
    /// - [`OrderError::OutletNotFound`] - outlet missing or deleted
    /// - [`OrderError::MenuUnavailable`] - a line has no active binding
    /// - [`OrderError::InsufficientStock`] - tracked stock can't cover a line
    /// - [`OrderError::Conflict`] - lost to concurrent writers repeatedly
    pub async fn place_order(&self, req: &NewOrder) -> Result<Order, OrderError> {
        validate_new_order(req)?;

        let mut attempt = 1;
        loop {
            match self.try_place(req).await {
                Err(OrderError::Conflict) if attempt < MAX_CONFLICT_RETRIES => {
                    warn!(
                        outlet_id = %req.outlet_id,
                        attempt = %attempt,
                        "Checkout conflicted with a concurrent write, retrying"
                    );
                    sleep(std::time::Duration::from_millis(
                        RETRY_BACKOFF_MS * attempt as u64,
                    ))
                    .await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// One checkout attempt: the full transaction, commit included.
    async fn try_place(&self, req: &NewOrder) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let rates = sqlx::query_as::<_, OutletRates>(
            "SELECT tax_rate, sc_rate FROM outlets WHERE id = ?1 AND is_deleted = 0",
        )
        .bind(req.outlet_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::OutletNotFound(req.outlet_id))?;

        // Resolve and reserve every line before any pricing. Lines are
        // processed independently: a menu id appearing twice is checked
        // against whatever stock the earlier line left.
        let mut priced = Vec::with_capacity(req.lines.len());
        let mut doc_items = Vec::with_capacity(req.lines.len());

        for line in &req.lines {
            let binding =
                reserve_line(&mut tx, req.outlet_id, line.menu_id, line.quantity).await?;
            priced.push(PricedLine {
                unit_price: binding.price,
                quantity: line.quantity,
            });

            let mut additionals = Vec::with_capacity(line.additionals.len());
            for add in &line.additionals {
                let add_binding =
                    reserve_line(&mut tx, req.outlet_id, add.additional_id, add.quantity).await?;
                priced.push(PricedLine {
                    unit_price: add_binding.price,
                    quantity: add.quantity,
                });
                additionals.push(OrderItemAdditional {
                    menu_id: add.additional_id,
                    quantity: add.quantity,
                    unit_price: add_binding.price,
                    line_total: add_binding.price * add.quantity,
                    name: None,
                    picture_url: None,
                });
            }

            let additionals_total: i64 = additionals.iter().map(|a| a.line_total).sum();
            doc_items.push(OrderItemLine {
                menu_id: line.menu_id,
                quantity: line.quantity,
                unit_price: binding.price,
                line_total: binding.price * line.quantity + additionals_total,
                additionals,
                name: None,
                picture_url: None,
            });
        }

        let breakdown = compute(&priced, rates.tax_rate, rates.sc_rate);
        let doc = OrderItemDoc {
            items: doc_items,
            summary: OrderSummary::from_breakdown(&breakdown),
        };
        let order_item = doc
            .encode()
            .map_err(|e| OrderError::Db(DbError::Internal(e.to_string())))?;

        let uid = Ulid::new().to_string();
        let now = chrono::Utc::now();

        debug!(
            uid = %uid,
            outlet_id = %req.outlet_id,
            lines = %req.lines.len(),
            "Inserting order row"
        );

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (uid, outlet_id, table_no, user_id, tax_rate, sc_rate,
                                subtotal, grand_total, order_item, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&uid)
        .bind(req.outlet_id)
        .bind(&req.table_no)
        .bind(req.user_id)
        .bind(rates.tax_rate)
        .bind(rates.sc_rate)
        .bind(breakdown.subtotal_rounded())
        .bind(breakdown.grand_total_rounded())
        .bind(&order_item)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            uid = %order.uid,
            outlet_id = %order.outlet_id,
            grand_total = %order.grand_total,
            "Order placed"
        );

        Ok(order)
    }
}

/// Resolves the active binding for one requested (menu, quantity) pair and
/// reserves stock when tracked.
///
/// Untracked stock (`NULL`) is never checked and never decremented. For
/// tracked stock the decrement re-asserts availability in its WHERE
/// clause; losing that race is a retryable conflict, not an oversell.
async fn reserve_line(
    tx: &mut Transaction<'_, Sqlite>,
    outlet_id: i64,
    menu_id: i64,
    quantity: i64,
) -> Result<BindingRow, OrderError> {
    let binding = sqlx::query_as::<_, BindingRow>(
        r#"
        SELECT id, price, stock FROM outlet_menus
        WHERE menu_id = ?1 AND outlet_id = ?2 AND is_deleted = 0
        "#,
    )
    .bind(menu_id)
    .bind(outlet_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(OrderError::MenuUnavailable { menu_id, outlet_id })?;

    if let Some(available) = binding.stock {
        if available < quantity {
            return Err(OrderError::InsufficientStock {
                menu_id,
                available,
                requested: quantity,
            });
        }

        let now = chrono::Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE outlet_menus SET stock = stock - ?1, updated_at = ?2
            WHERE id = ?3 AND stock >= ?1
            "#,
        )
        .bind(quantity)
        .bind(now)
        .bind(binding.id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::Conflict);
        }
    }

    Ok(binding)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::OrderError;
    use crate::pool::{Database, DbConfig};
    use warung_core::{AdditionalLine, NewBinding, NewMenuItem, NewOrder, NewOutlet, OrderLine};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds an outlet at 10% tax / 5% service charge. Returns its id.
    async fn seed_outlet(db: &Database) -> i64 {
        db.outlets()
            .insert(&NewOutlet {
                name: "Warung Pusat".to_string(),
                user_id: 1,
                tax_rate: 0.10,
                sc_rate: 0.05,
            })
            .await
            .unwrap()
            .id
    }

    /// Creates a menu item and binds it to the outlet. Returns the menu id.
    async fn seed_item(
        db: &Database,
        outlet_id: i64,
        sku: &str,
        price: i64,
        stock: Option<i64>,
    ) -> i64 {
        let menu = db
            .menus()
            .insert(&NewMenuItem {
                sku: sku.to_string(),
                name: sku.to_string(),
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
                outlet_id,
                price,
                stock,
                is_selling: true,
            })
            .await
            .unwrap();
        menu.id
    }

    fn order(outlet_id: i64, lines: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            outlet_id,
            table_no: "A1".to_string(),
            user_id: 7,
            lines,
        }
    }

    fn line(menu_id: i64, quantity: i64) -> OrderLine {
        OrderLine {
            menu_id,
            quantity,
            additionals: vec![],
        }
    }

    async fn stock_of(db: &Database, menu_id: i64, outlet_id: i64) -> Option<i64> {
        db.outlet_menus()
            .get_active(menu_id, outlet_id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    async fn order_count(db: &Database) -> usize {
        db.orders().list(None, None).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_successful_checkout_prices_and_decrements() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let menu_id = seed_item(&db, outlet_id, "NASI-01", 25_000, Some(10)).await;

        let placed = db
            .checkout()
            .place_order(&order(outlet_id, vec![line(menu_id, 2)]))
            .await
            .unwrap();

        assert_eq!(placed.subtotal, 50_000);
        assert_eq!(placed.grand_total, 57_750);
        assert_eq!(placed.tax_rate, 0.10);
        assert_eq!(placed.sc_rate, 0.05);
        assert_eq!(placed.uid.len(), 26);

        let doc = warung_core::order_item::OrderItemDoc::decode(&placed.order_item).unwrap();
        assert_eq!(doc.items[0].line_total, 50_000);
        assert_eq!(doc.summary.subtotal, "Rp50.000");
        assert_eq!(doc.summary.service_charge, "Rp2.500");
        assert_eq!(doc.summary.tax, "Rp5.250");
        assert_eq!(doc.summary.grand_total, "Rp57.750");

        assert_eq!(stock_of(&db, menu_id, outlet_id).await, Some(8));
    }

    #[tokio::test]
    async fn test_insufficient_stock_rejects_without_side_effects() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let menu_id = seed_item(&db, outlet_id, "NASI-01", 25_000, Some(10)).await;

        let err = db
            .checkout()
            .place_order(&order(outlet_id, vec![line(menu_id, 11)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrderError::InsufficientStock {
                available: 10,
                requested: 11,
                ..
            }
        ));
        assert_eq!(stock_of(&db, menu_id, outlet_id).await, Some(10));
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_unbound_menu_is_unavailable() {
        let db = test_db().await;
        let outlet_a = seed_outlet(&db).await;
        let outlet_b = seed_outlet(&db).await;
        // Bound to outlet A only.
        let menu_id = seed_item(&db, outlet_a, "NASI-01", 25_000, None).await;

        let err = db
            .checkout()
            .place_order(&order(outlet_b, vec![line(menu_id, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::MenuUnavailable { .. }));
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_untracked_stock_never_checked_or_decremented() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let menu_id = seed_item(&db, outlet_id, "NASI-01", 25_000, None).await;

        db.checkout()
            .place_order(&order(outlet_id, vec![line(menu_id, 500)]))
            .await
            .unwrap();

        assert_eq!(stock_of(&db, menu_id, outlet_id).await, None);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_earlier_decrements() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let nasi = seed_item(&db, outlet_id, "NASI-01", 25_000, Some(10)).await;
        let teh = seed_item(&db, outlet_id, "TEH-01", 5_000, Some(1)).await;

        let err = db
            .checkout()
            .place_order(&order(outlet_id, vec![line(nasi, 2), line(teh, 3)]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InsufficientStock { .. }));
        // The first line's decrement must not survive the rollback.
        assert_eq!(stock_of(&db, nasi, outlet_id).await, Some(10));
        assert_eq!(stock_of(&db, teh, outlet_id).await, Some(1));
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_lines_draw_from_the_same_stock() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let menu_id = seed_item(&db, outlet_id, "NASI-01", 25_000, Some(3)).await;

        // 2 + 2 against stock 3: the second line sees only 1 left.
        let err = db
            .checkout()
            .place_order(&order(outlet_id, vec![line(menu_id, 2), line(menu_id, 2)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
        assert_eq!(stock_of(&db, menu_id, outlet_id).await, Some(3));

        // Raise stock to 4 and the same request drains it exactly.
        let binding = db
            .outlet_menus()
            .get_active(menu_id, outlet_id)
            .await
            .unwrap()
            .unwrap();
        db.outlet_menus()
            .update(
                binding.id,
                &warung_core::BindingPatch {
                    stock: Some(Some(4)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let placed = db
            .checkout()
            .place_order(&order(outlet_id, vec![line(menu_id, 2), line(menu_id, 2)]))
            .await
            .unwrap();
        assert_eq!(placed.subtotal, 100_000);
        assert_eq!(stock_of(&db, menu_id, outlet_id).await, Some(0));
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected_before_any_work() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let menu_id = seed_item(&db, outlet_id, "NASI-01", 25_000, Some(10)).await;

        let err = db
            .checkout()
            .place_order(&order(outlet_id, vec![line(menu_id, 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(_)));

        let err = db
            .checkout()
            .place_order(&order(outlet_id, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(_)));

        assert_eq!(stock_of(&db, menu_id, outlet_id).await, Some(10));
    }

    #[tokio::test]
    async fn test_deleted_outlet_cannot_take_orders() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let menu_id = seed_item(&db, outlet_id, "NASI-01", 25_000, None).await;
        db.outlets().soft_delete(outlet_id).await.unwrap();

        let err = db
            .checkout()
            .place_order(&order(outlet_id, vec![line(menu_id, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::OutletNotFound(id) if id == outlet_id));
    }

    #[tokio::test]
    async fn test_additionals_are_priced_and_stock_guarded() {
        let db = test_db().await;
        let outlet_id = seed_outlet(&db).await;
        let nasi = seed_item(&db, outlet_id, "NASI-01", 25_000, Some(10)).await;
        let telur = seed_item(&db, outlet_id, "TELUR-01", 5_000, Some(4)).await;

        let placed = db
            .checkout()
            .place_order(&order(
                outlet_id,
                vec![OrderLine {
                    menu_id: nasi,
                    quantity: 1,
                    additionals: vec![AdditionalLine {
                        additional_id: telur,
                        quantity: 2,
                    }],
                }],
            ))
            .await
            .unwrap();

        // 25000 + 2 × 5000 = 35000; sc 1750; tax 3675; grand 40425.
        assert_eq!(placed.subtotal, 35_000);
        assert_eq!(placed.grand_total, 40_425);

        let doc = warung_core::order_item::OrderItemDoc::decode(&placed.order_item).unwrap();
        assert_eq!(doc.items[0].line_total, 35_000);
        assert_eq!(doc.items[0].additionals[0].line_total, 10_000);

        assert_eq!(stock_of(&db, nasi, outlet_id).await, Some(9));
        assert_eq!(stock_of(&db, telur, outlet_id).await, Some(2));

        // An add-on exceeding its own stock sinks the whole order.
        let err = db
            .checkout()
            .place_order(&order(
                outlet_id,
                vec![OrderLine {
                    menu_id: nasi,
                    quantity: 1,
                    additionals: vec![AdditionalLine {
                        additional_id: telur,
                        quantity: 3,
                    }],
                }],
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock { .. }));
        assert_eq!(stock_of(&db, nasi, outlet_id).await, Some(9));
        assert_eq!(stock_of(&db, telur, outlet_id).await, Some(2));
    }

    /// Two checkouts race for the last unit; exactly one may win.
    #[tokio::test]
    async fn test_concurrent_checkouts_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("race.db")).max_connections(4);
        let db = Database::new(config).await.unwrap();

        let outlet_id = seed_outlet(&db).await;
        let menu_id = seed_item(&db, outlet_id, "NASI-01", 25_000, Some(1)).await;

        let a = {
            let db = db.clone();
            tokio::spawn(async move {
                db.checkout()
                    .place_order(&order(outlet_id, vec![line(menu_id, 1)]))
                    .await
            })
        };
        let b = {
            let db = db.clone();
            tokio::spawn(async move {
                db.checkout()
                    .place_order(&order(outlet_id, vec![line(menu_id, 1)]))
                    .await
            })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(wins, 1, "exactly one of the racing checkouts may win");
        assert_eq!(stock_of(&db, menu_id, outlet_id).await, Some(0));
        assert_eq!(order_count(&db).await, 1);
    }
}
