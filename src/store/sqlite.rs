use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::debug;

use super::{StoreError, TicketStore};
use crate::ticket::{NewTicket, Ticket, TicketStatus};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tickets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ticket_id TEXT NOT NULL UNIQUE,
        user_email TEXT NOT NULL,
        subject TEXT NOT NULL,
        body TEXT NOT NULL,
        department TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'New',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_tickets_created_at ON tickets(created_at);
"#;

const COLUMNS: &str =
    "id, ticket_id, user_email, subject, body, department, status, created_at";

/// SQLite-backed ticket store. One connection, serialized behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Corrupt(format!("{}: {e}", parent.display())))?;
            }
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened ticket database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_one(&self, clause: &str, param: &dyn rusqlite::ToSql) -> Result<Ticket, StoreError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {COLUMNS} FROM tickets WHERE {clause}");
        let row = conn
            .query_row(&sql, [param], read_row)
            .optional()?
            .ok_or(StoreError::NotFound)?;
        row.into_ticket()
    }
}

impl TicketStore for SqliteStore {
    fn create(&self, ticket: &NewTicket) -> Result<Ticket, StoreError> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO tickets (ticket_id, user_email, subject, body, department, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ticket.ticket_id,
                ticket.user_email,
                ticket.subject,
                ticket.body,
                ticket.department,
                ticket.status.as_str(),
                format_timestamp(&ticket.created_at),
            ],
        );

        match inserted {
            Ok(_) => Ok(ticket.clone().into_ticket(conn.last_insert_rowid())),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StoreError::DuplicateTicketId(ticket.ticket_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, id: i64) -> Result<Ticket, StoreError> {
        self.query_one("id = ?1", &id)
    }

    fn get_by_ticket_id(&self, ticket_id: &str) -> Result<Ticket, StoreError> {
        self.query_one("ticket_id = ?1", &ticket_id)
    }

    fn list_newest_first(&self) -> Result<Vec<Ticket>, StoreError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {COLUMNS} FROM tickets ORDER BY created_at DESC, id DESC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawTicket::into_ticket).collect()
    }

    fn update(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE tickets SET status = ?1 WHERE id = ?2",
            params![ticket.status.as_str(), ticket.id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// Fixed-width UTC timestamps so that text ordering equals time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

struct RawTicket {
    id: i64,
    ticket_id: String,
    user_email: String,
    subject: String,
    body: String,
    department: String,
    status: String,
    created_at: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawTicket> {
    Ok(RawTicket {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        user_email: row.get(2)?,
        subject: row.get(3)?,
        body: row.get(4)?,
        department: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl RawTicket {
    fn into_ticket(self) -> Result<Ticket, StoreError> {
        let status: TicketStatus = self
            .status
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("status '{}'", self.status)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Corrupt(format!("created_at '{}': {e}", self.created_at)))?
            .with_timezone(&Utc);

        Ok(Ticket {
            id: self.id,
            ticket_id: self.ticket_id,
            user_email: self.user_email,
            subject: self.subject,
            body: self.body,
            department: self.department,
            status,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_ticket(body: &str) -> NewTicket {
        NewTicket::new(
            "a@x.com".into(),
            "Need help".into(),
            body.into(),
            "IT Support".into(),
        )
    }

    #[test]
    fn create_assigns_ids() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = store.create(&new_ticket("one")).unwrap();
        let b = store.create(&new_ticket("two")).unwrap();
        assert!(b.id > a.id);
        assert_eq!(a.status, TicketStatus::New);
    }

    #[test]
    fn create_rejects_duplicate_ticket_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = new_ticket("one");
        store.create(&first).unwrap();

        let mut second = new_ticket("two");
        second.ticket_id = first.ticket_id.clone();
        assert!(matches!(
            store.create(&second),
            Err(StoreError::DuplicateTicketId(id)) if id == first.ticket_id
        ));
        assert_eq!(store.list_newest_first().unwrap().len(), 1);
    }

    #[test]
    fn get_by_either_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let created = store.create(&new_ticket("wifi")).unwrap();

        let by_id = store.get(created.id).unwrap();
        let by_public = store.get_by_ticket_id(&created.ticket_id).unwrap();
        assert_eq!(by_id, by_public);
        assert_eq!(by_id.body, "wifi");
        assert_eq!(by_id.created_at, created.created_at);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(store.get(42), Err(StoreError::NotFound)));
        assert!(matches!(
            store.get_by_ticket_id("TICKET-deadbeef"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn list_is_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut older = new_ticket("older");
        older.created_at = Utc::now() - Duration::hours(1);
        let older = store.create(&older).unwrap();
        let newer = store.create(&new_ticket("newer")).unwrap();

        let listed: Vec<i64> = store
            .list_newest_first()
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, vec![newer.id, older.id]);
    }

    #[test]
    fn update_persists_status() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut ticket = store.create(&new_ticket("wifi")).unwrap();
        ticket.status = TicketStatus::InProgress;
        store.update(&ticket).unwrap();
        assert_eq!(store.get(ticket.id).unwrap().status, TicketStatus::InProgress);
    }

    #[test]
    fn update_unknown_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ticket = new_ticket("ghost").into_ticket(99);
        assert!(matches!(store.update(&ticket), Err(StoreError::NotFound)));
    }

    #[test]
    fn open_on_disk_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("queries.db");
        let created = {
            let store = SqliteStore::open(&path).unwrap();
            store.create(&new_ticket("persisted")).unwrap()
        };
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get(created.id).unwrap().body, "persisted");
    }
}
