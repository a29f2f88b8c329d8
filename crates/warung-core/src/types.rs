//! # Domain Types
//!
//! Core domain types for the Warung ordering backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Outlet      │   │    MenuItem     │   │   OutletMenu    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  tax_rate       │   │  sku (unique)   │   │  menu_id        │       │
//! │  │  sc_rate        │   │  name           │   │  outlet_id      │       │
//! │  │  is_deleted     │   │  is_subitem     │   │  price, stock   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Order       │   │   OrderView     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  uid (ULID)     │   │  Order fields + │                             │
//! │  │  rate snapshot  │   │  decoded item   │                             │
//! │  │  item document  │   │  document       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price and Stock Ownership
//! A [`MenuItem`] is outlet-agnostic and carries no price. The only entity
//! holding price and stock is the [`OutletMenu`] binding; the same menu item
//! can be priced (and stocked) differently per outlet. At most one active
//! (non-deleted) binding exists per (menu, outlet) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order_item::OrderItemDoc;

// =============================================================================
// Outlet
// =============================================================================

/// A restaurant branch: the unit of pricing and tax configuration.
///
/// `tax_rate` and `sc_rate` are fractions (0.10 = 10%). Every pricing
/// computation uses the specific outlet's rates at order time, never a
/// global default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Outlet {
    pub id: i64,

    /// Display name of the branch.
    pub name: String,

    /// Owning user (opaque external identifier; auth lives outside).
    pub user_id: i64,

    /// Tax rate as a fraction (0.10 = 10%).
    pub tax_rate: f64,

    /// Service-charge rate as a fraction (0.05 = 5%).
    pub sc_rate: f64,

    /// Soft-delete flag; deleted outlets cannot take orders.
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A sellable dish or composable add-on component, outlet-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub picture_url: Option<String>,

    /// Main item vs. composable sub-item (add-on).
    pub is_subitem: bool,

    /// Soft-delete flag.
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of menu data used to enrich order documents for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuDisplay {
    pub id: i64,
    pub name: String,
    pub picture_url: Option<String>,
}

// =============================================================================
// Outlet Menu (pricing/stock binding)
// =============================================================================

/// The per-outlet price/stock record for a menu item.
///
/// `stock = None` means untracked/unlimited: never checked, never
/// decremented.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OutletMenu {
    pub id: i64,
    pub menu_id: i64,
    pub outlet_id: i64,

    /// Unit price in whole rupiah.
    pub price: i64,

    /// Remaining stock; `None` = unlimited/untracked.
    pub stock: Option<i64>,

    /// Whether the item is currently offered for sale.
    pub is_selling: bool,

    /// Soft-delete flag.
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of an outlet's menu listing: the binding joined with the menu's
/// display fields. Built explicitly at the query boundary instead of a
/// generic column-renaming transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OutletMenuListing {
    pub id: i64,
    pub menu_id: i64,
    pub outlet_id: i64,
    pub price: i64,
    pub stock: Option<i64>,
    pub is_selling: bool,
    pub menu_sku: String,
    pub menu_name: String,
    pub menu_picture_url: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// A placed order, exactly as persisted.
///
/// ## Snapshot Pattern
/// `tax_rate`, `sc_rate`, `subtotal` and `grand_total` are frozen at
/// creation time. They are never recomputed from current outlet settings;
/// rate changes after placement must not rewrite order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,

    /// Globally unique external identifier (ULID).
    pub uid: String,

    pub outlet_id: i64,
    pub table_no: String,
    pub user_id: i64,

    /// Tax rate snapshot at creation time.
    pub tax_rate: f64,

    /// Service-charge rate snapshot at creation time.
    pub sc_rate: f64,

    /// Ceiling-rounded subtotal in whole rupiah.
    pub subtotal: i64,

    /// Ceiling-rounded grand total in whole rupiah.
    pub grand_total: i64,

    /// The encoded order-item document (JSON).
    pub order_item: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order as returned to readers: raw snapshot columns plus the decoded
/// item document.
///
/// Decoding is fail-soft: a malformed stored document yields
/// `order_item: None` rather than an error, given the row itself is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub uid: String,
    pub outlet_id: i64,
    pub table_no: String,
    pub user_id: i64,
    pub tax_rate: f64,
    pub sc_rate: f64,
    pub subtotal: i64,
    pub grand_total: i64,
    pub order_item: Option<OrderItemDoc>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let order_item = OrderItemDoc::decode(&order.order_item);
        OrderView {
            id: order.id,
            uid: order.uid,
            outlet_id: order.outlet_id,
            table_no: order.table_no,
            user_id: order.user_id,
            tax_rate: order.tax_rate,
            sc_rate: order.sc_rate,
            subtotal: order.subtotal,
            grand_total: order.grand_total,
            order_item,
            created_at: order.created_at,
        }
    }
}

// =============================================================================
// Request DTOs
// =============================================================================

/// An order placement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub outlet_id: i64,
    pub table_no: String,
    pub user_id: i64,

    /// Requested lines. Wire name matches the public API shape.
    #[serde(rename = "order_item")]
    pub lines: Vec<OrderLine>,
}

/// One requested order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_id: i64,
    pub quantity: i64,

    /// Optional add-on sub-lines attached to this line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additionals: Vec<AdditionalLine>,
}

/// One requested add-on sub-line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalLine {
    pub additional_id: i64,
    pub quantity: i64,
}

/// Partial order update. Creation invariants do not re-apply here; rates
/// and totals may be amended directly by an operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    pub table_no: Option<String>,
    pub tax_rate: Option<f64>,
    pub sc_rate: Option<f64>,
    pub subtotal: Option<i64>,
    pub grand_total: Option<i64>,
    pub order_item: Option<String>,
}

impl OrderPatch {
    /// True when the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        self.table_no.is_none()
            && self.tax_rate.is_none()
            && self.sc_rate.is_none()
            && self.subtotal.is_none()
            && self.grand_total.is_none()
            && self.order_item.is_none()
    }
}

/// Outlet creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOutlet {
    pub name: String,
    pub user_id: i64,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub sc_rate: f64,
}

/// Partial outlet update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutletPatch {
    pub name: Option<String>,
    pub tax_rate: Option<f64>,
    pub sc_rate: Option<f64>,
}

/// Menu item creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub picture_url: Option<String>,
    #[serde(default)]
    pub is_subitem: bool,
}

/// Partial menu item update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub picture_url: Option<String>,
}

/// Outlet-menu binding creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBinding {
    pub menu_id: i64,
    pub outlet_id: i64,
    pub price: i64,
    pub stock: Option<i64>,
    #[serde(default = "default_true")]
    pub is_selling: bool,
}

/// Partial binding update (price/stock/selling flag).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingPatch {
    pub price: Option<i64>,
    /// `Some(None)` clears stock tracking (unlimited); `None` leaves it.
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub stock: Option<Option<i64>>,
    pub is_selling: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Serde helper distinguishing "field absent" from "field set to null" for
/// the nullable stock column.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Option<i64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer).map(Some)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_wire_shape() {
        let json = r#"{
            "outlet_id": 1,
            "table_no": "A4",
            "user_id": 7,
            "order_item": [
                { "menu_id": 1, "quantity": 2 },
                { "menu_id": 3, "quantity": 1, "additionals": [{ "additional_id": 9, "quantity": 1 }] }
            ]
        }"#;

        let req: NewOrder = serde_json::from_str(json).unwrap();
        assert_eq!(req.lines.len(), 2);
        assert!(req.lines[0].additionals.is_empty());
        assert_eq!(req.lines[1].additionals[0].additional_id, 9);
    }

    #[test]
    fn test_order_patch_emptiness() {
        assert!(OrderPatch::default().is_empty());

        let patch = OrderPatch {
            table_no: Some("B2".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_binding_patch_stock_null_vs_absent() {
        let absent: BindingPatch = serde_json::from_str(r#"{"price": 1000}"#).unwrap();
        assert!(absent.stock.is_none());

        let cleared: BindingPatch = serde_json::from_str(r#"{"stock": null}"#).unwrap();
        assert_eq!(cleared.stock, Some(None));

        let set: BindingPatch = serde_json::from_str(r#"{"stock": 5}"#).unwrap();
        assert_eq!(set.stock, Some(Some(5)));
    }
}
