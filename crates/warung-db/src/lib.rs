//! # warung-db: Database Layer for the Warung Ordering Backend
//!
//! This crate provides database access for the ordering backend. It uses
//! SQLite via sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warung Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (create_order)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     warung-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Checkout   │  │   │
//! │  │   │   (pool.rs)   │    │ outlet, menu, │    │ (the single  │  │   │
//! │  │   │               │◄───│ binding,order │◄───│ transactional│  │   │
//! │  │   │ SqlitePool    │    │               │    │ write path)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database errors and the order failure taxonomy
//! - [`repository`] - Repository implementations (outlet, menu, order, ...)
//! - [`checkout`] - The order placement transaction coordinator

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::Checkout;
pub use error::{DbError, OrderError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::menu::MenuRepository;
pub use repository::order::OrderRepository;
pub use repository::outlet::OutletRepository;
pub use repository::outlet_menu::OutletMenuRepository;
