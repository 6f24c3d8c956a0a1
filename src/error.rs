use std::fmt;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum HelpdeskError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required fields")]
    MissingFields,

    #[error("Missing or invalid status")]
    InvalidStatus(String),

    #[error("Reply text is missing")]
    MissingReply,

    #[error("Ticket not found")]
    NotFound,

    #[error("{action}")]
    Persistence {
        action: Action,
        #[source]
        source: StoreError,
    },
}

impl HelpdeskError {
    /// Wraps a store failure, turning a missing row into [`HelpdeskError::NotFound`].
    pub fn from_store(action: Action, source: StoreError) -> Self {
        match source {
            StoreError::NotFound => HelpdeskError::NotFound,
            source => HelpdeskError::Persistence { action, source },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            HelpdeskError::Config(_) => ErrorKind::Config,
            HelpdeskError::MissingFields
            | HelpdeskError::InvalidStatus(_)
            | HelpdeskError::MissingReply => ErrorKind::Validation,
            HelpdeskError::NotFound => ErrorKind::NotFound,
            HelpdeskError::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}

/// Operation that touched the store; its `Display` is the message returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SaveTicket,
    FetchTickets,
    FindTicket,
    UpdateStatus,
    SendReply,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::SaveTicket => "Failed to save ticket.",
            Action::FetchTickets => "Failed to fetch tickets",
            Action::FindTicket => "Failed to find ticket",
            Action::UpdateStatus => "Failed to update status",
            Action::SendReply => "Failed to send reply",
        })
    }
}

/// Coarse classification of a [`HelpdeskError`] for the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input; caller can fix and resend.
    Validation,
    /// Unknown ticket by internal or public id.
    NotFound,
    /// Storage operation failed; the operation was aborted.
    Persistence,
    /// Startup configuration is unusable.
    Config,
}
