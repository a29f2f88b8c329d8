//! # Repository Module
//!
//! Database repository implementations for the Warung backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.outlet_menus().list_by_outlet(4)                           │
//! │       ▼                                                                 │
//! │  OutletMenuRepository                                                  │
//! │  ├── bind(&self, req)                                                  │
//! │  ├── get_active(&self, menu_id, outlet_id)                             │
//! │  └── update(&self, id, patch)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Row-to-domain mapping is explicit per entity (no generic            │
//! │    column-renaming transform)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`outlet::OutletRepository`] - Outlet CRUD
//! - [`menu::MenuRepository`] - Menu CRUD and sub-item edges
//! - [`outlet_menu::OutletMenuRepository`] - Per-outlet price/stock bindings
//! - [`order::OrderRepository`] - Order read paths and partial update
//!
//! The order placement write path lives in [`crate::checkout`], not here:
//! it spans several tables inside one transaction and doesn't fit the
//! one-entity-per-repository shape.

pub mod menu;
pub mod order;
pub mod outlet;
pub mod outlet_menu;
