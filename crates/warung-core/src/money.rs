//! # Money Module
//!
//! Rupiah rounding and display formatting.
//!
//! ## Why Ceiling Rounding?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PERSISTED vs DISPLAYED VALUES                                          │
//! │                                                                         │
//! │  Rates are fractions (tax 0.10, sc 0.05), so intermediate totals are   │
//! │  floats:                                                                │
//! │    subtotal 9.999 × sc 0.05 = 499.95                                   │
//! │                                                                         │
//! │  Rupiah has no usable sub-unit, so every amount the customer sees or   │
//! │  the order row stores is a whole number. We round UP (ceiling) to the  │
//! │  next rupiah, then format, so the stored integer and the displayed     │
//! │  string always agree.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use warung_core::money::{ceil_to_rupiah, format_rupiah};
//!
//! assert_eq!(ceil_to_rupiah(499.95), 500);
//! assert_eq!(format_rupiah(57750), "Rp57.750");
//! ```

// =============================================================================
// Rounding
// =============================================================================

/// Rounds an amount up to the next whole rupiah.
///
/// This is the single rounding rule for persisted order totals: the stored
/// `subtotal` and `grand_total` are always `ceil()` of the computed float.
#[inline]
pub fn ceil_to_rupiah(amount: f64) -> i64 {
    amount.ceil() as i64
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Formats a whole-rupiah amount as a display string.
///
/// Indonesian convention: `Rp` prefix, `.` as the thousands separator, no
/// fraction digits.
///
/// ## Example
/// ```rust
/// use warung_core::money::format_rupiah;
///
/// assert_eq!(format_rupiah(57750), "Rp57.750");
/// assert_eq!(format_rupiah(500), "Rp500");
/// assert_eq!(format_rupiah(0), "Rp0");
/// ```
pub fn format_rupiah(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.unsigned_abs().to_string();

    // Group digits in threes from the right, separated by dots.
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{sign}Rp{grouped}")
}

// =============================================================================
// Unit Tests
// =============================================================================
