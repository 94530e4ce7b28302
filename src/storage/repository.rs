use crate::core::{Notes, Ticket, TicketId, TicketState};
use crate::error::{Result, TickletError};

/// Repository trait for ticket storage operations
///
/// This trait defines the interface the lifecycle layer uses to resolve,
/// create, move and remove tickets and to access their notes documents.
pub trait TicketRepository: Send + Sync {
    /// Finds a ticket, failing with `TicketNotFound` if it does not exist
    fn find(&self, id: &TicketId) -> Result<Ticket> {
        self.find_optional(id)?
            .ok_or_else(|| TickletError::TicketNotFound { id: id.to_string() })
    }

    /// Finds a ticket, returning `None` if it does not exist
    fn find_optional(&self, id: &TicketId) -> Result<Option<Ticket>>;

    /// Creates a new active ticket
    fn create(&self, id: &TicketId) -> Result<Ticket>;

    /// Deletes a ticket and all of its contents
    fn delete(&self, ticket: &Ticket) -> Result<()>;

    /// Lists active tickets, plus archived ones if requested
    fn list(&self, include_archived: bool) -> Result<Vec<Ticket>>;

    /// Moves a ticket to the archive
    fn archive(&self, ticket: &Ticket) -> Result<Ticket>;

    /// Moves a ticket out of the archive
    fn unarchive(&self, ticket: &Ticket) -> Result<Ticket>;

    /// Reads the notes document of a ticket, `None` if it has none
    fn read_notes(&self, ticket: &Ticket) -> Result<Option<Notes>>;

    /// Writes a notes document snapshot back to disk
    fn write_notes(&self, notes: &Notes) -> Result<()>;

    /// Recreates a missing notes document from the template
    fn restore_notes(&self, ticket: &Ticket) -> Result<Notes>;
}

use super::file::FileStorage;

impl TicketRepository for FileStorage {
    fn find_optional(&self, id: &TicketId) -> Result<Option<Ticket>> {
        self.find_ticket(id)
    }

    fn create(&self, id: &TicketId) -> Result<Ticket> {
        self.create_ticket(id)
    }

    fn delete(&self, ticket: &Ticket) -> Result<()> {
        self.delete_ticket(ticket)
    }

    fn list(&self, include_archived: bool) -> Result<Vec<Ticket>> {
        self.list_tickets(include_archived)
    }

    fn archive(&self, ticket: &Ticket) -> Result<Ticket> {
        self.move_ticket(ticket, TicketState::Archived)
    }

    fn unarchive(&self, ticket: &Ticket) -> Result<Ticket> {
        self.move_ticket(ticket, TicketState::Active)
    }

    fn read_notes(&self, ticket: &Ticket) -> Result<Option<Notes>> {
        Notes::read(&ticket.notes_path())
    }

    fn write_notes(&self, notes: &Notes) -> Result<()> {
        notes.write()
    }

    fn restore_notes(&self, ticket: &Ticket) -> Result<Notes> {
        tracing::warn!("Ticket {} has no notes document, recreating it", ticket.id);
        self.create_notes(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestStore;

    #[test]
    fn test_ticket_repository_create_and_find() {
        let store = TestStore::new();
        let id = TicketId::parse("T1").unwrap();

        store.storage.create(&id).expect("Failed to create ticket");

        let ticket = store.storage.find(&id).expect("Failed to find ticket");
        assert_eq!(ticket.id, id);
        assert_eq!(ticket.state, TicketState::Active);
        assert_eq!(ticket.path, store.active_dir().join("T1"));

        let notes = store
            .storage
            .read_notes(&ticket)
            .expect("Failed to read notes")
            .expect("Notes should exist");
        assert_eq!(notes.status, "New");
        assert_eq!(notes.summary, "");
    }

    #[test]
    fn test_ticket_repository_create_existing_fails() {
        let store = TestStore::new();
        let id = TicketId::parse("T1").unwrap();

        store.storage.create(&id).expect("Failed to create ticket");
        let err = store.storage.create(&id).unwrap_err();
        assert!(matches!(err, TickletError::TicketExists { .. }));
    }

    #[test]
    fn test_ticket_repository_not_found() {
        let store = TestStore::new();
        let id = TicketId::parse("nonexistent").unwrap();

        let err = store.storage.find(&id).unwrap_err();
        assert!(matches!(err, TickletError::TicketNotFound { .. }));

        let found = store
            .storage
            .find_optional(&id)
            .expect("Optional lookup should not fail");
        assert!(found.is_none());
    }

    #[test]
    fn test_ticket_repository_archive_and_unarchive() {
        let store = TestStore::new();
        let ticket = store.create("T1");
        std::fs::write(ticket.path.join("attachment.txt"), "keep me").unwrap();

        let archived = store.storage.archive(&ticket).expect("Failed to archive");
        assert_eq!(archived.state, TicketState::Archived);
        assert!(!ticket.path.exists());

        let found = store.storage.find(&ticket.id).unwrap();
        assert_eq!(found, archived);
        assert!(found.path.join("attachment.txt").is_file());

        let restored = store.storage.unarchive(&found).expect("Failed to unarchive");
        assert_eq!(restored.state, TicketState::Active);
        assert!(!archived.path.exists());
        assert_eq!(store.storage.find(&ticket.id).unwrap(), restored);
    }

    #[test]
    fn test_ticket_repository_archive_is_idempotent() {
        let store = TestStore::new();
        let ticket = store.create("T1");

        let archived = store.storage.archive(&ticket).unwrap();
        let again = store.storage.archive(&archived).unwrap();
        assert_eq!(archived, again);
        assert!(again.path.is_dir());

        let active = store.storage.unarchive(&again).unwrap();
        let still_active = store.storage.unarchive(&active).unwrap();
        assert_eq!(active, still_active);
    }

    #[test]
    fn test_ticket_repository_delete() {
        let store = TestStore::new();
        let ticket = store.create("T1");

        store.storage.delete(&ticket).expect("Failed to delete ticket");

        assert!(!ticket.path.exists());
        assert!(store.storage.find_optional(&ticket.id).unwrap().is_none());
    }

    #[test]
    fn test_ticket_repository_list() {
        let store = TestStore::new();
        store.create("T1");
        store.create("T2");
        let t3 = store.create("T3");
        store.storage.archive(&t3).unwrap();

        let mut active: Vec<_> = store
            .storage
            .list(false)
            .unwrap()
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        active.sort();
        assert_eq!(active, vec!["T1", "T2"]);

        let all = store.storage.list(true).unwrap();
        assert_eq!(all.len(), 3);
        assert!(
            all.iter()
                .any(|t| t.id.as_str() == "T3" && t.state == TicketState::Archived)
        );
    }

    #[test]
    fn test_ticket_never_found_in_both_states() {
        let store = TestStore::new();
        for id in ["A", "B", "C"] {
            let ticket = store.create(id);
            let archived = store.storage.archive(&ticket).unwrap();
            assert!(!store.storage.ticket_path(&ticket.id, TicketState::Active).exists());
            assert!(archived.path.is_dir());
        }
        let all = store.storage.list(true).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|t| t.state == TicketState::Archived));
    }

    #[test]
    fn test_ticket_repository_restore_notes() {
        let store = TestStore::new();
        let ticket = store.create("T1");
        std::fs::remove_file(ticket.notes_path()).unwrap();
        assert!(store.storage.read_notes(&ticket).unwrap().is_none());

        let notes = store.storage.restore_notes(&ticket).unwrap();
        assert_eq!(notes.status, "New");
        assert!(ticket.notes_path().is_file());
    }
}
