mod lifecycle;
mod record;

pub use lifecycle::{Lifecycle, Transition};
pub use record::{NewTicket, Ticket, TicketStatus, TicketStatusView};
