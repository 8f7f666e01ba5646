//! HTTP handlers.

pub mod board;
pub mod health;

pub use board::handle_board;
pub use health::health_check;

use crate::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide connection pool.
    pub db: Database,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
