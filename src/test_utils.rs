//! Test utilities for ticklet
//!
//! Common fixtures shared by the unit tests across the crate.

#![cfg(test)]

use crate::core::{Ticket, TicketId};
use crate::storage::FileStorage;
use std::path::PathBuf;
use tempfile::TempDir;

/// Ticket store rooted in a temporary directory
pub struct TestStore {
    pub temp_dir: TempDir,
    pub storage: FileStorage,
}

impl TestStore {
    /// Create a store with both state directories in place
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::new(
            temp_dir.path().join("active"),
            temp_dir.path().join("archive"),
        );
        storage
            .ensure_directories()
            .expect("Failed to create ticket directories");

        Self { temp_dir, storage }
    }

    /// Create an active ticket from the default template
    pub fn create(&self, id: &str) -> Ticket {
        let id = TicketId::parse(id).expect("Invalid test ticket id");
        self.storage
            .create_ticket(&id)
            .expect("Failed to create ticket")
    }

    pub fn active_dir(&self) -> PathBuf {
        self.temp_dir.path().join("active")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.temp_dir.path().join("archive")
    }
}
