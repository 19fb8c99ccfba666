pub mod ticket;

pub use ticket::{ticket_validity, NewTicket, Ticket, TicketStatus, UnknownStatus};
