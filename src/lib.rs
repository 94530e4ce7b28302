//! ticklet - a personal ticket tracker built on plain directories
//!
//! Every ticket is a directory holding a Markdown notes document:
//!
//! ```text
//! # Ticket T1
//!
//! _Summary_: Fix login
//! _Status_ : In progress
//!
//!
//! ## Files
//!
//! - /home/me/src/app/login.rs
//!
//!
//! ## Notes
//!
//! Free text, kept as written.
//! ```
//!
//! The summary, status and files of a notes document are rewritten in place,
//! leaving every other byte alone. Tickets live under an active or an archive
//! directory and are opened by handing their paths to configurable plugins.

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::new_without_default)]

//! # Example
//!
//! ```rust,ignore
//! use ticklet::core::{LifecycleController, TicketId};
//! use ticklet::config::Config;
//!
//! let config = Config::load(None, None)?;
//! let storage = config.storage();
//! let pipeline = config.pipeline();
//! let controller = LifecycleController::new(&storage, &pipeline);
//!
//! let ticket = controller.create(&TicketId::parse("T1")?)?;
//! controller.set_status(&ticket, "In progress")?;
//! let ticket = controller.archive(&ticket)?;
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod interactive;
pub mod plugins;
pub mod storage;
pub mod templates;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{Result, TickletError};
