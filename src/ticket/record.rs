use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HelpdeskError;

/// Prefix of every public ticket id.
pub const TICKET_ID_PREFIX: &str = "TICKET-";

/// Lifecycle status of a ticket. Serialized with the exact labels shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(rename = "New")]
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Resolved")]
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::New,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| HelpdeskError::InvalidStatus(s.to_string()))
    }
}

/// Generate a short shareable ticket id such as `TICKET-1a2b3c4d`.
pub fn generate_ticket_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{TICKET_ID_PREFIX}{}", &uuid[..8])
}

/// A ticket before the store has assigned it an internal id.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub ticket_id: String,
    pub user_email: String,
    pub subject: String,
    pub body: String,
    pub department: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl NewTicket {
    pub fn new(user_email: String, subject: String, body: String, department: String) -> Self {
        Self {
            ticket_id: generate_ticket_id(),
            user_email,
            subject,
            body,
            department,
            status: TicketStatus::New,
            // Stored with microsecond precision; truncate up front so the
            // returned ticket equals what a later read yields.
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn into_ticket(self, id: i64) -> Ticket {
        Ticket {
            id,
            ticket_id: self.ticket_id,
            user_email: self.user_email,
            subject: self.subject,
            body: self.body,
            department: self.department,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// A persisted helpdesk ticket. Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub ticket_id: String,
    pub user_email: String,
    pub subject: String,
    pub body: String,
    pub department: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// The subset of a ticket exposed to submitters looking up their own ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatusView {
    pub ticket_id: String,
    pub subject: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Ticket> for TicketStatusView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id.clone(),
            subject: ticket.subject.clone(),
            status: ticket.status,
            created_at: ticket.created_at,
        }
    }
}
