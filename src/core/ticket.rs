use crate::error::{Result, TickletError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the notes document inside each ticket directory
pub const NOTES_FILE_NAME: &str = "notes.md";

/// Identifier of a ticket, which doubles as its directory name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    /// Parse a user supplied id, rejecting anything that is not a plain
    /// directory name
    pub fn parse(id: &str) -> Result<Self> {
        let invalid = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\', '\0']);
        if invalid {
            return Err(TickletError::InvalidTicketId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for TicketId {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// The two persisted storage states of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketState {
    Active,
    Archived,
}

impl TicketState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    /// The state a ticket moves to on archive/unarchive
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::Active => Self::Archived,
            Self::Archived => Self::Active,
        }
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a ticket's location at the time it was resolved
///
/// A `Ticket` is never updated in place. Mutating store operations return a
/// fresh value, and any other handle must be re-resolved afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub state: TicketState,
    pub path: PathBuf,
}

impl Ticket {
    #[must_use]
    pub const fn new(id: TicketId, state: TicketState, path: PathBuf) -> Self {
        Self { id, state, path }
    }

    /// Location of the ticket's notes document
    #[must_use]
    pub fn notes_path(&self) -> PathBuf {
        self.path.join(NOTES_FILE_NAME)
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.state == TicketState::Archived
    }
}
