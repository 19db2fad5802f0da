//! Vec-backed [`TicketStore`] fake with the same id-assignment and ordering
//! semantics as the SQLite store. Used by presentation tests.

use chrono::Local;

use super::{StoreError, TicketStore};
use crate::ticket::{Status, Ticket, TicketDraft};

#[derive(Default)]
pub struct MemoryStore {
    tickets: Vec<Ticket>,
    next_id: i64,
    /// Counts every mutating call, so tests can assert an action never
    /// reached storage.
    pub mutations: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketStore for MemoryStore {
    fn create(&mut self, draft: &TicketDraft) -> Result<i64, StoreError> {
        self.mutations += 1;
        self.next_id += 1;
        self.tickets.push(Ticket {
            id: self.next_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category,
            priority: draft.priority,
            status: Status::Open,
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
        Ok(self.next_id)
    }

    fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        let mut tickets = self.tickets.clone();
        tickets.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tickets)
    }

    fn update_status(&mut self, id: i64, status: Status) -> Result<(), StoreError> {
        self.mutations += 1;
        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == id) {
            ticket.status = status;
        }
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.mutations += 1;
        self.tickets.retain(|t| t.id != id);
        Ok(())
    }
}
