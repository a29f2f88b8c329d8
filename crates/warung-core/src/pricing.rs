//! # Pricing Calculator
//!
//! Pure computation of an order's price breakdown from resolved line prices
//! and the outlet's rate configuration.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Price Breakdown Pipeline                           │
//! │                                                                         │
//! │  lines [(unit_price, quantity), ...]                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  subtotal       = Σ unit_price × quantity                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  service_charge = subtotal × sc_rate                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tax            = (subtotal + service_charge) × tax_rate               │
//! │       │            ^^^^^^^^^^^^^^^^^^^^^^^^^^                          │
//! │       │            tax applies AFTER the service charge, never on      │
//! │       │            the bare subtotal                                    │
//! │       ▼                                                                 │
//! │  grand_total    = subtotal + service_charge + tax                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The persisted `subtotal` / `grand_total` integers are the ceiling of the
//! computed floats (see [`crate::money`]); the raw floats stay available for
//! callers that need them.

use crate::money::ceil_to_rupiah;

// =============================================================================
// Input
// =============================================================================

/// One resolved order line: the outlet-scoped unit price and the requested
/// quantity. Add-on sub-lines are flattened into this shape as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// Unit price in whole rupiah.
    pub unit_price: i64,
    /// Requested quantity (validated positive before pricing).
    pub quantity: i64,
}

impl PricedLine {
    /// Line total before charges (unit_price × quantity).
    #[inline]
    pub const fn line_total(&self) -> i64 {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Output
// =============================================================================

/// The computed price breakdown of one order.
///
/// Values are kept as raw floats; use the `*_rounded` accessors for the
/// integers that get persisted and displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakdown {
    pub subtotal: f64,
    pub service_charge: f64,
    pub tax: f64,
    pub grand_total: f64,
}

impl Breakdown {
    /// Subtotal rounded up to the next rupiah (the persisted value).
    #[inline]
    pub fn subtotal_rounded(&self) -> i64 {
        ceil_to_rupiah(self.subtotal)
    }

    /// Service charge rounded up to the next rupiah.
    #[inline]
    pub fn service_charge_rounded(&self) -> i64 {
        ceil_to_rupiah(self.service_charge)
    }

    /// Tax rounded up to the next rupiah.
    #[inline]
    pub fn tax_rounded(&self) -> i64 {
        ceil_to_rupiah(self.tax)
    }

    /// Grand total rounded up to the next rupiah (the persisted value).
    #[inline]
    pub fn grand_total_rounded(&self) -> i64 {
        ceil_to_rupiah(self.grand_total)
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Computes the full price breakdown for a set of priced lines.
///
/// ## Arguments
/// * `lines` - resolved (unit_price, quantity) pairs, add-ons included
/// * `tax_rate` - the outlet's tax rate as a fraction (0.10 = 10%)
/// * `sc_rate` - the outlet's service-charge rate as a fraction
///
/// ## Invariant
/// Tax is computed on `subtotal + service_charge`, not on the subtotal
/// alone. Swapping that order silently undercharges tax whenever the
/// service-charge rate is non-zero.
///
/// ## Example
/// ```rust
/// use warung_core::pricing::{compute, PricedLine};
///
/// let lines = [PricedLine { unit_price: 25_000, quantity: 2 }];
/// let breakdown = compute(&lines, 0.10, 0.05);
///
/// assert_eq!(breakdown.subtotal, 50_000.0);
/// assert_eq!(breakdown.service_charge, 2_500.0);
/// assert_eq!(breakdown.tax, 5_250.0);
/// assert_eq!(breakdown.grand_total, 57_750.0);
/// ```
pub fn compute(lines: &[PricedLine], tax_rate: f64, sc_rate: f64) -> Breakdown {
    let subtotal: f64 = lines.iter().map(|l| l.line_total() as f64).sum();

    let service_charge = subtotal * sc_rate;
    let tax = (subtotal + service_charge) * tax_rate;
    let grand_total = subtotal + service_charge + tax;

    Breakdown {
        subtotal,
        service_charge,
        tax,
        grand_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
