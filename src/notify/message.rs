//! Composition of the emails the helpdesk sends.
//!
//! Each function is pure: it takes the ticket (and whatever else the email
//! mentions) and returns a [`Notification`] ready for a [`Notifier`](super::Notifier).

use serde::{Deserialize, Serialize};

use crate::ticket::{Ticket, TicketStatus};

/// A plain-text email addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Alert for the department a new ticket was routed to.
pub fn department_alert(ticket: &Ticket, department_address: &str) -> Notification {
    Notification {
        recipient: department_address.to_string(),
        subject: format!(
            "New Query from {}: {} [{}]",
            ticket.user_email, ticket.subject, ticket.ticket_id
        ),
        body: format!(
            "A new query has been routed to your department.\n\n\
             From: {}\n\
             Subject: {}\n\n\
             Query:\n---\n{}\n---",
            ticket.user_email, ticket.subject, ticket.body
        ),
    }
}

/// Receipt sent to the submitter once their ticket is stored.
pub fn submission_receipt(ticket: &Ticket) -> Notification {
    Notification {
        recipient: ticket.user_email.clone(),
        subject: format!("Query Received: Your Ticket ID is {}", ticket.ticket_id),
        body: format!(
            "Hello,\n\n\
             Thank you for contacting us. We have received your query and routed it to the {}.\n\n\
             Your Ticket ID is: {}",
            ticket.department, ticket.ticket_id
        ),
    }
}

/// Status change notice for the submitter. Resolved tickets get a closing remark.
pub fn status_update(ticket: &Ticket) -> Notification {
    let mut body = format!(
        "Hello,\n\n\
         This is an update on your query (Ticket ID: {}).\n\
         Your ticket status has been changed to: {}\n\n",
        ticket.ticket_id, ticket.status
    );
    if ticket.status == TicketStatus::Resolved {
        body.push_str(
            "Your query is now considered resolved. If you have any further questions, \
             please feel free to submit a new query.\n\n",
        );
    }
    body.push_str("Best regards,\nAutomated Helpdesk");

    Notification {
        recipient: ticket.user_email.clone(),
        subject: format!("Update on your ticket: {}", ticket.ticket_id),
        body,
    }
}

/// An agent's answer, framed as the solution to the ticket's subject.
pub fn solution(ticket: &Ticket, reply_text: &str) -> Notification {
    Notification {
        recipient: ticket.user_email.clone(),
        subject: format!("Solution for your ticket: {}", ticket.ticket_id),
        body: format!(
            "Hello,\n\n\
             Here is the solution for your query regarding '{}':\n\n\
             --- Solution ---\n\
             {}\n\
             ----------------\n\n\
             This query is now considered resolved.\n\n\
             Best regards,\nHelpdesk Team",
            ticket.subject, reply_text
        ),
    }
}
