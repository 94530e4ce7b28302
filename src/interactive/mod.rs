//! Interactive prompts
//!
//! Destructive actions ask the user before touching the filesystem.

use crate::core::TicketId;
use crate::error::Result;
use dialoguer::{Confirm, theme::ColorfulTheme};

/// Decides whether a ticket may be deleted
pub trait DeletePrompt {
    fn confirm_delete(&self, id: &TicketId) -> Result<bool>;
}

/// Asks on the terminal
pub struct InteractiveMode {
    theme: ColorfulTheme,
}

impl InteractiveMode {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for InteractiveMode {
    fn default() -> Self {
        Self::new()
    }
}

impl DeletePrompt for InteractiveMode {
    /// Defaults to no, so pressing enter keeps the ticket
    fn confirm_delete(&self, id: &TicketId) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(format!("Are you sure you want to delete {id}?"))
            .default(false)
            .interact()
            .map_err(Into::into)
    }
}

/// Answers yes without asking, for `--yes`
pub struct AssumeYes;

impl DeletePrompt for AssumeYes {
    fn confirm_delete(&self, id: &TicketId) -> Result<bool> {
        tracing::debug!("Deleting {id} without confirmation");
        Ok(true)
    }
}
