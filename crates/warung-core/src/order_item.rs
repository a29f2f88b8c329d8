//! # Order Item Codec
//!
//! The structured, persisted breakdown of an order's lines and computed
//! summary, and its (de)serialization to the stored representation.
//!
//! ## Document Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Order Item Document Lifecycle                         │
//! │                                                                         │
//! │  CHECKOUT (write path)                                                 │
//! │    resolved lines + breakdown ──► OrderItemDoc ──► encode() ──► TEXT   │
//! │    column on the order row. Built once, immutable afterwards except    │
//! │    through explicit order update.                                      │
//! │                                                                         │
//! │  READ PATH                                                             │
//! │    TEXT column ──► decode() ──► Option<OrderItemDoc>                   │
//! │    Fail-soft: malformed JSON yields None, never an error; the order    │
//! │    row itself is still served.                                         │
//! │                                                                         │
//! │  DISPLAY ENRICHMENT (read path, optional)                              │
//! │    enrich() resolves each line's menu_id to the CURRENT menu name and  │
//! │    picture. This reads live menu data and is NOT part of the stored    │
//! │    record: a rename after placement changes what re-reads display.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::format_rupiah;
use crate::pricing::Breakdown;
use crate::types::MenuDisplay;

// =============================================================================
// Document Model
// =============================================================================

/// The persisted order-item document: line items plus the price summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDoc {
    pub items: Vec<OrderItemLine>,
    pub summary: OrderSummary,
}

/// One line item inside the document.
///
/// `name` / `picture_url` are display-only enrichment fields: absent in the
/// stored record, filled from live menu data on enriched reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemLine {
    pub menu_id: i64,
    pub quantity: i64,

    /// Unit price snapshot in whole rupiah.
    pub unit_price: i64,

    /// unit_price × quantity plus any add-on totals.
    pub line_total: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additionals: Vec<OrderItemAdditional>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

/// An add-on sub-line attached to a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemAdditional {
    pub menu_id: i64,
    pub quantity: i64,
    pub unit_price: i64,
    pub line_total: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

/// The display summary embedded in the document.
///
/// Values are pre-formatted Rupiah strings, ceiling-rounded before
/// formatting so they always agree with the integer snapshot persisted on
/// the order row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: String,
    pub service_charge: String,
    pub tax: String,
    pub grand_total: String,
}

impl OrderSummary {
    /// Builds the display summary from a computed breakdown.
    pub fn from_breakdown(breakdown: &Breakdown) -> Self {
        OrderSummary {
            subtotal: format_rupiah(breakdown.subtotal_rounded()),
            service_charge: format_rupiah(breakdown.service_charge_rounded()),
            tax: format_rupiah(breakdown.tax_rounded()),
            grand_total: format_rupiah(breakdown.grand_total_rounded()),
        }
    }
}

// =============================================================================
// Codec
// =============================================================================

impl OrderItemDoc {
    /// Serializes the document to the stored representation (JSON text).
    pub fn encode(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a stored document back to structured form.
    ///
    /// Fail-soft by contract: malformed or empty input yields `None`
    /// rather than propagating a parse error, because the order row it
    /// came from is otherwise valid and must still be served.
    pub fn decode(raw: &str) -> Option<OrderItemDoc> {
        if raw.trim().is_empty() {
            return None;
        }
        serde_json::from_str(raw).ok()
    }

    /// All distinct menu ids referenced by the document, add-ons included.
    /// Used to batch the display lookup on enriched reads.
    pub fn menu_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .items
            .iter()
            .flat_map(|item| {
                std::iter::once(item.menu_id)
                    .chain(item.additionals.iter().map(|a| a.menu_id))
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Fills each line's display fields from the given live menu data.
    ///
    /// A menu id with no entry (e.g. hard-deleted since placement) simply
    /// stays unenriched; the numeric snapshot is untouched either way.
    pub fn enrich(&mut self, displays: &HashMap<i64, MenuDisplay>) {
        for item in &mut self.items {
            if let Some(display) = displays.get(&item.menu_id) {
                item.name = Some(display.name.clone());
                item.picture_url = display.picture_url.clone();
            }
            for additional in &mut item.additionals {
                if let Some(display) = displays.get(&additional.menu_id) {
                    additional.name = Some(display.name.clone());
                    additional.picture_url = display.picture_url.clone();
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{compute, PricedLine};

    fn sample_doc() -> OrderItemDoc {
        let breakdown = compute(
            &[PricedLine {
                unit_price: 25_000,
                quantity: 2,
            }],
            0.10,
            0.05,
        );

        OrderItemDoc {
            items: vec![OrderItemLine {
                menu_id: 1,
                quantity: 2,
                unit_price: 25_000,
                line_total: 50_000,
                additionals: vec![OrderItemAdditional {
                    menu_id: 9,
                    quantity: 1,
                    unit_price: 5_000,
                    line_total: 5_000,
                    name: None,
                    picture_url: None,
                }],
                name: None,
                picture_url: None,
            }],
            summary: OrderSummary::from_breakdown(&breakdown),
        }
    }

    #[test]
    fn test_encode_decode_preserves_document() {
        let doc = sample_doc();
        let raw = doc.encode().unwrap();
        let decoded = OrderItemDoc::decode(&raw).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_summary_strings_are_ceiled_and_formatted() {
        let doc = sample_doc();
        assert_eq!(doc.summary.subtotal, "Rp50.000");
        assert_eq!(doc.summary.service_charge, "Rp2.500");
        assert_eq!(doc.summary.tax, "Rp5.250");
        assert_eq!(doc.summary.grand_total, "Rp57.750");
    }

    #[test]
    fn test_decode_is_fail_soft() {
        assert!(OrderItemDoc::decode("").is_none());
        assert!(OrderItemDoc::decode("   ").is_none());
        assert!(OrderItemDoc::decode("not json at all").is_none());
        assert!(OrderItemDoc::decode(r#"{"items": "wrong shape"}"#).is_none());
    }

    #[test]
    fn test_display_fields_stay_out_of_stored_form() {
        let mut doc = sample_doc();
        doc.items[0].name = Some("Nasi Goreng".to_string());

        let raw = doc.encode().unwrap();
        assert!(raw.contains("Nasi Goreng"));

        // Unenriched documents must not serialize null display fields.
        let plain = sample_doc().encode().unwrap();
        assert!(!plain.contains("\"name\""));
        assert!(!plain.contains("picture_url"));
    }

    #[test]
    fn test_menu_ids_dedupes_across_lines_and_additionals() {
        let mut doc = sample_doc();
        doc.items.push(doc.items[0].clone());
        assert_eq!(doc.menu_ids(), vec![1, 9]);
    }

    #[test]
    fn test_enrich_fills_known_ids_only() {
        let mut doc = sample_doc();
        let mut displays = HashMap::new();
        displays.insert(
            1,
            MenuDisplay {
                id: 1,
                name: "Nasi Goreng".to_string(),
                picture_url: Some("https://cdn.example/nasi.jpg".to_string()),
            },
        );

        doc.enrich(&displays);

        assert_eq!(doc.items[0].name.as_deref(), Some("Nasi Goreng"));
        assert_eq!(
            doc.items[0].picture_url.as_deref(),
            Some("https://cdn.example/nasi.jpg")
        );
        // Menu 9 has no display entry; the add-on stays unenriched.
        assert!(doc.items[0].additionals[0].name.is_none());
    }
}
