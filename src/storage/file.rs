use crate::core::{Notes, Ticket, TicketId, TicketState};
use crate::error::{Result, TickletError};
use crate::templates::NotesTemplate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory-backed ticket store
///
/// Every ticket is a directory named after its id, living either under the
/// active root or the archive root:
///
/// ```text
/// <active_dir>/<id>/notes.md
/// <archive_dir>/<id>/notes.md
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    active_dir: PathBuf,
    archive_dir: PathBuf,
    template: NotesTemplate,
}

impl FileStorage {
    pub fn new(active_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            active_dir: active_dir.into(),
            archive_dir: archive_dir.into(),
            template: NotesTemplate::default(),
        }
    }

    /// Use `template` for the notes document of newly created tickets
    #[must_use]
    pub fn with_template(mut self, template: NotesTemplate) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn root(&self, state: TicketState) -> &Path {
        match state {
            TicketState::Active => &self.active_dir,
            TicketState::Archived => &self.archive_dir,
        }
    }

    #[must_use]
    pub fn ticket_path(&self, id: &TicketId, state: TicketState) -> PathBuf {
        self.root(state).join(id)
    }

    /// Create both state directories if they are missing
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.active_dir)?;
        fs::create_dir_all(&self.archive_dir)?;
        Ok(())
    }

    /// Look a ticket up, active directory first
    pub fn find_ticket(&self, id: &TicketId) -> Result<Option<Ticket>> {
        let mut found = None;
        for state in [TicketState::Active, TicketState::Archived] {
            let path = self.ticket_path(id, state);
            if !path.is_dir() {
                continue;
            }
            if found.is_some() {
                tracing::warn!(
                    "Ticket {id} exists both as active and archived, using the active one"
                );
                break;
            }
            found = Some(Ticket::new(id.clone(), state, path));
        }
        Ok(found)
    }

    /// Create a new active ticket with a notes document from the template
    pub fn create_ticket(&self, id: &TicketId) -> Result<Ticket> {
        if self.ticket_path(id, TicketState::Archived).exists() {
            return Err(TickletError::TicketExists { id: id.to_string() });
        }

        let path = self.ticket_path(id, TicketState::Active);
        fs::create_dir_all(&self.active_dir)?;
        fs::create_dir(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                TickletError::TicketExists { id: id.to_string() }
            } else {
                e.into()
            }
        })?;

        let ticket = Ticket::new(id.clone(), TicketState::Active, path);
        self.create_notes(&ticket)?;
        tracing::info!("Created ticket {} at {}", id, ticket.path.display());
        Ok(ticket)
    }

    /// Write a fresh notes document for `ticket` from the template
    pub fn create_notes(&self, ticket: &Ticket) -> Result<Notes> {
        Notes::create(ticket.notes_path(), &self.template.render(&ticket.id))
    }

    /// Remove the ticket directory and everything in it
    pub fn delete_ticket(&self, ticket: &Ticket) -> Result<()> {
        fs::remove_dir_all(&ticket.path)?;
        tracing::info!("Deleted ticket {} from {}", ticket.id, ticket.path.display());
        Ok(())
    }

    /// Enumerate tickets in directory order
    pub fn list_tickets(&self, include_archived: bool) -> Result<Vec<Ticket>> {
        let mut tickets = self.list_tickets_in(TicketState::Active)?;
        if include_archived {
            tickets.extend(self.list_tickets_in(TicketState::Archived)?);
        }
        Ok(tickets)
    }

    fn list_tickets_in(&self, state: TicketState) -> Result<Vec<Ticket>> {
        let root = self.root(state);
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut tickets = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::warn!("Skipping non UTF-8 ticket directory {}", entry.path().display());
                continue;
            };
            match TicketId::parse(name) {
                Ok(id) => tickets.push(Ticket::new(id, state, entry.path())),
                Err(e) => tracing::warn!("Skipping {}: {e}", entry.path().display()),
            }
        }
        Ok(tickets)
    }

    /// Relocate a ticket to the root of `target`
    ///
    /// A ticket already in `target` is returned unchanged without touching
    /// the filesystem.
    pub fn move_ticket(&self, ticket: &Ticket, target: TicketState) -> Result<Ticket> {
        if ticket.state == target {
            tracing::debug!("Ticket {} is already {target}, not moving", ticket.id);
            return Ok(ticket.clone());
        }

        let target_path = self.ticket_path(&ticket.id, target);
        if target_path.exists() {
            return Err(TickletError::TicketExists {
                id: ticket.id.to_string(),
            });
        }
        fs::create_dir_all(self.root(target))?;

        match fs::rename(&ticket.path, &target_path) {
            Ok(()) => {},
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                tracing::debug!("Rename across filesystems, copying {}", ticket.path.display());
                copy_dir_all(&ticket.path, &target_path)?;
                fs::remove_dir_all(&ticket.path)?;
            },
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Moved ticket {} to {}", ticket.id, target_path.display());
        Ok(Ticket::new(ticket.id.clone(), target, target_path))
    }
}

fn copy_dir_all(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let dest = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), dest)?;
        }
    }
    Ok(())
}
