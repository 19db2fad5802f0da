//! The persistence boundary.
//!
//! Presentation code talks to storage exclusively through [`TicketStore`],
//! so it can run against the SQLite-backed [`SqliteStore`] in the app and
//! against the in-memory [`MemoryStore`] in tests.

pub mod memory;
pub mod sqlite;

use thiserror::Error;

use crate::ticket::{Status, Ticket, TicketDraft};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying file or connection cannot be used. Never retried;
    /// callers surface it to the user and the action fails.
    #[error("ticket storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

/// CRUD capability over the single `tickets` table.
///
/// Storage performs no validation of draft contents; that is the caller's
/// contract. Each operation is a single atomic statement.
pub trait TicketStore {
    /// Inserts a new ticket with `status = Open` and `created_at = now`,
    /// returning the assigned id. Durable before returning.
    fn create(&mut self, draft: &TicketDraft) -> Result<i64, StoreError>;

    /// All tickets ordered by id descending (newest first), freshly read.
    fn list(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Sets the status of the matching row. Silently a no-op when `id`
    /// matches nothing.
    fn update_status(&mut self, id: i64, status: Status) -> Result<(), StoreError>;

    /// Removes the matching row. Silently a no-op when `id` matches nothing.
    fn delete(&mut self, id: i64) -> Result<(), StoreError>;
}
