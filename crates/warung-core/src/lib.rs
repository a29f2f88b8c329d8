//! # warung-core: Pure Business Logic for the Warung Ordering Backend
//!
//! This crate is the **heart** of the system. It contains the pricing math,
//! the order-item codec, and request validation as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warung Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    create_order, list_orders, menu/outlet CRUD                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ warung-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │ order_item │  │ validation│  │   │
//! │  │   │  Outlet   │  │ Breakdown │  │   codec    │  │   rules   │  │   │
//! │  │   │   Order   │  │  compute  │  │   enrich   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    warung-db (Database Layer)                   │   │
//! │  │        SQLite repositories, migrations, order checkout          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Outlet, MenuItem, OutletMenu, Order, DTOs)
//! - [`pricing`] - The pricing calculator (subtotal → sc → tax → grand total)
//! - [`money`] - Rupiah rounding and display formatting
//! - [`order_item`] - Order-item document codec (encode / fail-soft decode)
//! - [`validation`] - Request validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no side effects
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order_item;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use order_item::{OrderItemDoc, OrderSummary};
pub use pricing::{Breakdown, PricedLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single order.
///
/// ## Business Reason
/// Prevents runaway requests and keeps the checkout transaction short;
/// each line costs one read plus at most one stock write.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum unit price of a binding, in whole rupiah (100 million).
///
/// ## Business Reason
/// No dish costs that much; a larger value is a data-entry mistake. The
/// cap also keeps every line total (price x quantity) comfortably inside
/// i64 arithmetic.
pub const MAX_UNIT_PRICE: i64 = 100_000_000;
