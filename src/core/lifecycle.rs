use super::{Notes, Ticket, TicketId};
use crate::error::{Result, TickletError};
use crate::plugins::{LaunchReport, Launcher, OpenRequest};
use crate::storage::TicketRepository;
use std::path::PathBuf;

/// Sequences store and notes operations for a ticket
///
/// A ticket moves `NonExistent -> Active <-> Archived -> Deleted`. Every
/// operation other than `create` requires the ticket to exist and fails with
/// `TicketNotFound` otherwise.
pub struct LifecycleController<'a, R: TicketRepository> {
    repo: &'a R,
    launcher: &'a dyn Launcher,
}

impl<'a, R: TicketRepository> LifecycleController<'a, R> {
    pub fn new(repo: &'a R, launcher: &'a dyn Launcher) -> Self {
        Self { repo, launcher }
    }

    pub fn find(&self, id: &TicketId) -> Result<Ticket> {
        self.repo.find(id)
    }

    pub fn find_optional(&self, id: &TicketId) -> Result<Option<Ticket>> {
        self.repo.find_optional(id)
    }

    pub fn create(&self, id: &TicketId) -> Result<Ticket> {
        self.repo.create(id)
    }

    /// Replace the status line of the ticket's notes
    pub fn set_status(&self, ticket: &Ticket, status: &str) -> Result<Notes> {
        single_line("status", status)?;
        self.update_notes(ticket, |notes| notes.with_status(status))
    }

    /// Replace the summary line of the ticket's notes
    pub fn set_summary(&self, ticket: &Ticket, summary: &str) -> Result<Notes> {
        single_line("summary", summary)?;
        self.update_notes(ticket, |notes| notes.with_summary(summary))
    }

    /// Replace the files list of the ticket's notes
    pub fn set_files(&self, ticket: &Ticket, files: Vec<String>) -> Result<Notes> {
        for file in &files {
            single_line("file", file)?;
        }
        self.update_notes(ticket, |notes| notes.with_files(files))
    }

    fn update_notes(&self, ticket: &Ticket, change: impl FnOnce(Notes) -> Notes) -> Result<Notes> {
        self.ensure_exists(ticket)?;
        let notes = match self.repo.read_notes(ticket)? {
            Some(notes) => notes,
            None => self.repo.restore_notes(ticket)?,
        };
        let updated = change(notes);
        self.repo.write_notes(&updated)?;
        tracing::debug!(
            "Updated notes of {}: status={:?} summary={:?}",
            ticket.id,
            updated.status,
            updated.summary
        );
        Ok(updated)
    }

    pub fn archive(&self, ticket: &Ticket) -> Result<Ticket> {
        self.ensure_exists(ticket)?;
        self.repo.archive(ticket)
    }

    pub fn unarchive(&self, ticket: &Ticket) -> Result<Ticket> {
        self.ensure_exists(ticket)?;
        self.repo.unarchive(ticket)
    }

    /// Remove the ticket for good
    pub fn delete(&self, ticket: Ticket) -> Result<()> {
        self.ensure_exists(&ticket)?;
        self.repo.delete(&ticket)
    }

    /// Paths relevant to a ticket
    ///
    /// With a notes document these are the notes file and every referenced
    /// file, plus the parent directory of each. Without one, only the ticket
    /// directory.
    pub fn open_request(&self, ticket: &Ticket) -> Result<OpenRequest> {
        self.ensure_exists(ticket)?;
        let Some(notes) = self.repo.read_notes(ticket)? else {
            return Ok(OpenRequest {
                files: Vec::new(),
                directories: vec![ticket.path.clone()],
            });
        };

        let mut request = OpenRequest::default();
        let referenced = notes
            .files
            .iter()
            .filter(|f| !f.is_empty())
            .map(PathBuf::from);
        for file in std::iter::once(notes.path.clone()).chain(referenced) {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                request.push_directory(parent.to_path_buf());
            }
            request.files.push(file);
        }
        Ok(request)
    }

    /// Hand the ticket's paths to the configured filters and openers
    pub fn open(&self, ticket: &Ticket) -> Result<LaunchReport> {
        let request = self.open_request(ticket)?;
        tracing::debug!(
            "Opening {} with {} files and {} directories",
            ticket.id,
            request.files.len(),
            request.directories.len()
        );
        Ok(self.launcher.launch(request))
    }

    fn ensure_exists(&self, ticket: &Ticket) -> Result<()> {
        if ticket.path.is_dir() {
            Ok(())
        } else {
            Err(TickletError::TicketNotFound {
                id: ticket.id.to_string(),
            })
        }
    }
}

/// Field values are written on a line of their own
fn single_line(field: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(TickletError::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
