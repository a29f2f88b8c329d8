//! # Database Error Types
//!
//! Error types for database operations and the order placement taxonomy.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderError (checkout only) ← Busy becomes a retryable Conflict        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in server) ← Status code + JSON body for the client         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use warung_core::ValidationError;

// =============================================================================
// DbError
// =============================================================================

/// Database operation errors.
///
/// These wrap sqlx errors and provide additional context for debugging and
/// user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database (missing id or soft-deleted record).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (duplicate SKU, duplicate active
    /// binding, duplicate order UID).
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database is locked by a concurrent writer and the busy timeout
    /// elapsed, or the transaction's snapshot went stale. Retryable.
    #[error("Database busy: concurrent write in progress")]
    Busy,

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint/busy type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraint and contention failures via
                // message text:
                //   UNIQUE:   "UNIQUE constraint failed: <table>.<column>"
                //   FK:       "FOREIGN KEY constraint failed"
                //   BUSY:     "database is locked" (incl. stale WAL snapshots)
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked")
                    || msg.contains("database table is locked")
                {
                    DbError::Busy
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// OrderError
// =============================================================================

/// The order placement failure taxonomy.
///
/// Every variant except [`OrderError::Conflict`] is terminal for the
/// request; `Conflict` is retried internally a bounded number of times
/// before being surfaced. Any failure rolls the whole checkout
/// transaction back; there is never a partial order or partial stock
/// deduction.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed request, rejected before any transaction work.
    #[error("Invalid order: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Outlet missing or soft-deleted.
    #[error("Outlet not found: {0}")]
    OutletNotFound(i64),

    /// No active outlet-menu binding for a requested item.
    #[error("Menu {menu_id} not available at outlet {outlet_id}")]
    MenuUnavailable { menu_id: i64, outlet_id: i64 },

    /// Requested quantity exceeds the binding's tracked stock.
    #[error("Insufficient stock for menu {menu_id}: available {available}, requested {requested}")]
    InsufficientStock {
        menu_id: i64,
        available: i64,
        requested: i64,
    },

    /// Concurrent modification detected on a stock row; retryable.
    #[error("Order conflicts with a concurrent write")]
    Conflict,

    /// Unexpected storage fault.
    #[error(transparent)]
    Db(DbError),
}

/// Routes sqlx failures into the taxonomy: contention becomes a retryable
/// `Conflict`, everything else is a storage fault.
impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        match DbError::from(err) {
            DbError::Busy => OrderError::Conflict,
            other => OrderError::Db(other),
        }
    }
}

impl From<DbError> for OrderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Busy => OrderError::Conflict,
            other => OrderError::Db(other),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_messages() {
        let err = OrderError::InsufficientStock {
            menu_id: 4,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for menu 4: available 3, requested 5"
        );

        let err = OrderError::MenuUnavailable {
            menu_id: 4,
            outlet_id: 2,
        };
        assert_eq!(err.to_string(), "Menu 4 not available at outlet 2");
    }

    #[test]
    fn test_busy_maps_to_conflict() {
        let err: OrderError = DbError::Busy.into();
        assert!(matches!(err, OrderError::Conflict));

        let err: OrderError = DbError::QueryFailed("boom".to_string()).into();
        assert!(matches!(err, OrderError::Db(_)));
    }
}
