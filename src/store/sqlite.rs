//! SQLite-backed [`TicketStore`].

use std::path::Path;
use std::str::FromStr;

use chrono::Local;
use rusqlite::{params, Connection};

use super::{StoreError, TicketStore};
use crate::ticket::{Category, Priority, Status, Ticket, TicketDraft};

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT,
    priority TEXT,
    status TEXT,
    created_at TEXT
)
";

const INSERT_TICKET: &str = "
INSERT INTO tickets (title, description, category, priority, status, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

const SELECT_TICKETS: &str = "
SELECT id, title, description, category, priority, status, created_at
FROM tickets
ORDER BY id DESC
";

const UPDATE_STATUS: &str = "UPDATE tickets SET status = ?1 WHERE id = ?2";

const DELETE_TICKET: &str = "DELETE FROM tickets WHERE id = ?1";

/// Owns the single local database file for the process lifetime. The
/// connection runs in autocommit mode, so every statement is committed
/// before the call returns.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and ensures the schema exists.
    /// Safe to call on every startup.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::bootstrap(&conn)?;
        Ok(Self { conn })
    }

    /// An in-memory database. Data is lost when the store is dropped.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(&conn)?;
        Ok(Self { conn })
    }

    fn bootstrap(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(())
    }
}

fn row_to_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let category: String = row.get(3)?;
    let priority: String = row.get(4)?;
    let status: String = row.get(5)?;
    // Rows are never rejected on read; unknown strings fall back to the
    // default variant.
    Ok(Ticket {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: Category::from_str(&category).unwrap_or_default(),
        priority: Priority::from_str(&priority).unwrap_or_default(),
        status: Status::from_str(&status).unwrap_or_default(),
        created_at: row.get(6)?,
    })
}

impl TicketStore for SqliteStore {
    fn create(&mut self, draft: &TicketDraft) -> Result<i64, StoreError> {
        let created_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.conn.execute(
            INSERT_TICKET,
            params![
                draft.title,
                draft.description,
                draft.category.to_string(),
                draft.priority.to_string(),
                Status::Open.to_string(),
                created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_TICKETS)?;
        let rows = stmt.query_map([], row_to_ticket)?;
        let tickets = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(tickets)
    }

    fn update_status(&mut self, id: i64, status: Status) -> Result<(), StoreError> {
        // Affected-row count intentionally ignored: a missing id is a no-op.
        self.conn
            .execute(UPDATE_STATUS, params![status.to_string(), id])?;
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.conn.execute(DELETE_TICKET, params![id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bootstrap_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        SqliteStore::bootstrap(&store.conn).unwrap();
        SqliteStore::bootstrap(&store.conn).unwrap();
    }

    #[test]
    fn unknown_enum_strings_fall_back_to_defaults() {
        let mut store = SqliteStore::in_memory().unwrap();
        store
            .conn
            .execute(
                INSERT_TICKET,
                params![
                    "Legacy row",
                    "Written by an older build",
                    "Facilities",
                    "Urgent",
                    "Reopened",
                    "2024-01-01 00:00:00",
                ],
            )
            .unwrap();

        let tickets = store.list().unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].category, Category::General);
        assert_eq!(tickets[0].priority, Priority::Medium);
        assert_eq!(tickets[0].status, Status::Open);
    }
}
