use serde::{Deserialize, Serialize};

use super::record::{Ticket, TicketStatus};

/// The effect of a status update on a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// The ticket already had the requested status; nothing to announce.
    Unchanged,
    /// The status moved; the submitter is notified of `to`.
    Changed { from: TicketStatus, to: TicketStatus },
}

/// Applies status changes to a `Ticket`.
///
/// Any of the three statuses may follow any other: `New → In Progress →
/// Resolved` is the usual path, but reopening is allowed.
pub struct Lifecycle;

impl Lifecycle {
    /// Move the ticket to `new_status`, reporting whether anything changed.
    pub fn set_status(ticket: &mut Ticket, new_status: TicketStatus) -> Transition {
        if ticket.status == new_status {
            return Transition::Unchanged;
        }

        let from = ticket.status;
        ticket.status = new_status;
        Transition::Changed {
            from,
            to: new_status,
        }
    }

    /// Set `Resolved` without the same-status check. Used by the reply path,
    /// which always notifies and always writes.
    pub fn force_resolve(ticket: &mut Ticket) -> TicketStatus {
        std::mem::replace(&mut ticket.status, TicketStatus::Resolved)
    }
}
