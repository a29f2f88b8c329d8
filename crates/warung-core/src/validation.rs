//! # Validation Module
//!
//! Request validation for the ordering backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (deserialization)                               │
//! │  └── Type/shape validation via serde                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  └── Runs BEFORE any transaction work; an invalid order never          │
//! │      touches stock                                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / UNIQUE / CHECK constraints                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewOrder, OrderLine};
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Order Validation
// =============================================================================

/// Validates an order placement request.
///
/// ## Rules
/// - `outlet_id` and `user_id` must be positive
/// - `table_no` must be non-empty, at most 20 characters
/// - the line list must be non-empty with at most [`MAX_ORDER_LINES`] lines
/// - every quantity (lines and add-ons) must be in `1..=MAX_LINE_QUANTITY`
///
/// Rejected requests never reach the checkout transaction, so a zero
/// quantity can never cause a partial stock mutation.
pub fn validate_new_order(order: &NewOrder) -> ValidationResult<()> {
    validate_id("outlet_id", order.outlet_id)?;
    validate_id("user_id", order.user_id)?;
    validate_table_no(&order.table_no)?;

    if order.lines.is_empty() {
        return Err(ValidationError::Empty {
            field: "order_item".to_string(),
        });
    }

    if order.lines.len() > MAX_ORDER_LINES {
        return Err(ValidationError::TooMany {
            field: "order_item".to_string(),
            max: MAX_ORDER_LINES,
        });
    }

    for line in &order.lines {
        validate_order_line(line)?;
    }

    Ok(())
}

fn validate_order_line(line: &OrderLine) -> ValidationResult<()> {
    validate_id("menu_id", line.menu_id)?;
    validate_quantity(line.quantity)?;

    for additional in &line.additionals {
        validate_id("additional_id", additional.additional_id)?;
        validate_quantity(additional.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a quantity value: positive and within the sanity cap.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an entity identifier (ids are positive integers).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a table number string.
pub fn validate_table_no(table_no: &str) -> ValidationResult<()> {
    let table_no = table_no.trim();

    if table_no.is_empty() {
        return Err(ValidationError::Required {
            field: "table_no".to_string(),
        });
    }

    if table_no.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "table_no".to_string(),
            max: 20,
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a menu or outlet display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a rate fraction (tax or service charge).
///
/// Rates are fractions, not percentages: 0.10 means 10%. Anything at 1.0
/// or above is almost certainly a unit mistake.
pub fn validate_rate(field: &str, rate: f64) -> ValidationResult<()> {
    if !(0.0..1.0).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 1,
        });
    }
    Ok(())
}

/// Validates a price in whole rupiah: non-negative and within the sanity
/// cap, so line totals never approach integer overflow.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
