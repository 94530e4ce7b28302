use crate::cli::output::OutputFormatter;
use crate::core::Notes;
use crate::error::Result;
use crate::storage::TicketRepository;

/// Handle `--list` and `--list-all`
///
/// Tickets are sorted by id. A ticket without a readable notes document
/// shows an empty summary and status.
pub fn handle_list(
    repo: &impl TicketRepository,
    include_archived: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut tickets = repo.list(include_archived)?;
    tickets.sort_by(|a, b| a.id.cmp(&b.id));

    let mut rows = Vec::with_capacity(tickets.len());
    for ticket in &tickets {
        let notes = match repo.read_notes(ticket) {
            Ok(notes) => notes.unwrap_or_default(),
            Err(e) => {
                formatter.warning(&format!(
                    "Cannot read notes of {}: {}",
                    ticket.id,
                    e.user_message()
                ));
                Notes::default()
            },
        };
        rows.push((ticket.id.as_str(), notes.summary, notes.status));
    }

    formatter.print_tickets(
        rows.iter()
            .map(|(id, summary, status)| (*id, summary.as_str(), status.as_str())),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestStore;
    use std::fs;

    #[test]
    fn test_list_skips_unreadable_notes() {
        let store = TestStore::new();
        let broken = store.create("T1");
        store.create("T2");
        fs::write(broken.notes_path(), [0xff, 0xfe, b'\n']).unwrap();

        assert!(store.storage.read_notes(&broken).is_err());
        handle_list(&store.storage, false, &OutputFormatter::new(true)).unwrap();
    }
}
