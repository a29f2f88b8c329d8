//! Shared application state.

use warung_db::Database;

/// State handed to every handler. Cloning clones the pool reference, not
/// the pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
