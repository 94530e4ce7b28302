//! Command handlers
//!
//! Each handler receives already loaded collaborators so it can be driven
//! from `main` or from tests.

mod list;
mod tickets;

pub use list::handle_list;
pub use tickets::{TicketActions, handle_tickets};
