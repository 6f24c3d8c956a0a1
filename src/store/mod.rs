//! Ticket persistence.
//!
//! [`TicketStore`] is the seam between the orchestrator and storage;
//! [`SqliteStore`] is the production implementation.

mod sqlite;

pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::ticket::{NewTicket, Ticket};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ticket not found")]
    NotFound,

    #[error("ticket id {0} already exists")]
    DuplicateTicketId(String),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Storage operations the helpdesk needs. Tickets are never deleted.
pub trait TicketStore: Send + Sync {
    /// Persist a new ticket, returning it with its assigned internal id.
    fn create(&self, ticket: &NewTicket) -> Result<Ticket, StoreError>;

    fn get(&self, id: i64) -> Result<Ticket, StoreError>;

    fn get_by_ticket_id(&self, ticket_id: &str) -> Result<Ticket, StoreError>;

    /// All tickets, most recently created first.
    fn list_newest_first(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Write back the mutable fields of an existing ticket.
    fn update(&self, ticket: &Ticket) -> Result<(), StoreError>;
}
