//! Core ticket types, the notes document engine and lifecycle orchestration

mod lifecycle;
mod notes;
mod ticket;

pub use lifecycle::LifecycleController;
pub use notes::{BULLET_PREFIX, FILES_HEADER, HEADING_PREFIX, Notes, STATUS_MARKER, SUMMARY_MARKER};
pub use ticket::{NOTES_FILE_NAME, Ticket, TicketId, TicketState};
