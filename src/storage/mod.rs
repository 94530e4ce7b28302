//! Directory-backed ticket storage

mod file;
mod repository;

pub use file::FileStorage;
pub use repository::TicketRepository;
