use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{Action, HelpdeskError};
use crate::notify::{message, Notifier};
use crate::router::DepartmentRouter;
use crate::store::{StoreError, TicketStore};
use crate::ticket::{Lifecycle, NewTicket, Ticket, TicketStatus, TicketStatusView, Transition};

/// How many fresh ticket ids to try when the store reports a collision.
const MAX_TICKET_ID_ATTEMPTS: u32 = 3;

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket_id: String,
    pub department: String,
}

/// Drives tickets from submission to resolution.
///
/// Every operation writes to the store first and notifies afterwards, except
/// [`reply_and_resolve`](Self::reply_and_resolve) which mails the solution
/// before recording the resolution. Notifications are best-effort.
pub struct TicketOrchestrator {
    router: DepartmentRouter,
    store: Arc<dyn TicketStore>,
    notifier: Arc<dyn Notifier>,
}

impl TicketOrchestrator {
    pub fn new(
        router: DepartmentRouter,
        store: Arc<dyn TicketStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            router,
            store,
            notifier,
        }
    }

    /// Validate, classify, store and announce a new query.
    pub fn submit_query(
        &self,
        user_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<Submission, HelpdeskError> {
        if user_email.is_empty() || subject.is_empty() || body.is_empty() {
            return Err(HelpdeskError::MissingFields);
        }

        let department = self.router.route(Some(body));
        let ticket = self.create_ticket(user_email, subject, body, &department.name)?;
        info!(
            ticket_id = %ticket.ticket_id,
            department = %ticket.department,
            "ticket created"
        );

        self.notifier
            .send(&message::department_alert(&ticket, &department.address));
        self.notifier.send(&message::submission_receipt(&ticket));

        Ok(Submission {
            ticket_id: ticket.ticket_id,
            department: ticket.department,
        })
    }

    fn create_ticket(
        &self,
        user_email: &str,
        subject: &str,
        body: &str,
        department: &str,
    ) -> Result<Ticket, HelpdeskError> {
        let mut attempt = 1;
        loop {
            let new_ticket = NewTicket::new(
                user_email.to_string(),
                subject.to_string(),
                body.to_string(),
                department.to_string(),
            );
            match self.store.create(&new_ticket) {
                Ok(ticket) => return Ok(ticket),
                Err(StoreError::DuplicateTicketId(id)) if attempt < MAX_TICKET_ID_ATTEMPTS => {
                    warn!(ticket_id = %id, attempt, "ticket id collision, regenerating");
                    attempt += 1;
                }
                Err(e) => {
                    error!(error = %e, "database save failed");
                    return Err(HelpdeskError::from_store(Action::SaveTicket, e));
                }
            }
        }
    }

    pub fn list_tickets(&self) -> Result<Vec<Ticket>, HelpdeskError> {
        self.store.list_newest_first().map_err(|e| {
            error!(error = %e, "could not fetch tickets");
            HelpdeskError::from_store(Action::FetchTickets, e)
        })
    }

    /// Public status of a ticket, looked up by its shareable id.
    pub fn lookup(&self, ticket_id: &str) -> Result<TicketStatusView, HelpdeskError> {
        let ticket = self
            .store
            .get_by_ticket_id(ticket_id)
            .map_err(|e| HelpdeskError::from_store(Action::FindTicket, e))?;
        Ok(TicketStatusView::from(&ticket))
    }

    /// Change a ticket's status and tell the submitter, unless nothing changed.
    pub fn set_status(&self, id: i64, status: &str) -> Result<Ticket, HelpdeskError> {
        let new_status: TicketStatus = status.parse()?;
        let mut ticket = self.load(id, Action::UpdateStatus)?;

        let transition = Lifecycle::set_status(&mut ticket, new_status);
        let Transition::Changed { from, to } = transition else {
            return Ok(ticket);
        };

        self.store.update(&ticket).map_err(|e| {
            error!(id, error = %e, "could not update status");
            HelpdeskError::from_store(Action::UpdateStatus, e)
        })?;
        info!(
            ticket_id = %ticket.ticket_id,
            %from,
            %to,
            "status changed, notifying {}",
            ticket.user_email
        );

        self.notifier.send(&message::status_update(&ticket));
        Ok(ticket)
    }

    /// Mail `reply_text` to the submitter as the solution, then mark the ticket resolved.
    ///
    /// Unlike [`set_status`](Self::set_status) this always notifies and always
    /// writes, even for a ticket that is already resolved.
    pub fn reply_and_resolve(&self, id: i64, reply_text: &str) -> Result<Ticket, HelpdeskError> {
        if reply_text.is_empty() {
            return Err(HelpdeskError::MissingReply);
        }
        let mut ticket = self.load(id, Action::SendReply)?;

        self.notifier.send(&message::solution(&ticket, reply_text));

        Lifecycle::force_resolve(&mut ticket);
        self.store.update(&ticket).map_err(|e| {
            error!(id, error = %e, "could not record reply");
            HelpdeskError::from_store(Action::SendReply, e)
        })?;
        info!(
            ticket_id = %ticket.ticket_id,
            "reply sent to {} and ticket marked as Resolved",
            ticket.user_email
        );

        Ok(ticket)
    }

    fn load(&self, id: i64, action: Action) -> Result<Ticket, HelpdeskError> {
        self.store
            .get(id)
            .map_err(|e| HelpdeskError::from_store(action, e))
    }
}
